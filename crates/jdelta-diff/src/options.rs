use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// Configuration for a diff run.
///
/// Every option is off by default and each one composes with the others.
///
/// ```toml
/// invertible = true
/// factorize = true
/// rationalize = false
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffOptions {
    /// Precede every `remove` and `replace` with a `test` of the value it
    /// is about to discard.
    pub invertible: bool,
    /// Merge equal `remove`/`add` pairs into `move`, and turn additions of
    /// values still present elsewhere into `copy`.
    pub factorize: bool,
    /// Pick the shorter of nested operations or a whole-subtree `replace`,
    /// and drop `test`s implied by earlier ones.
    pub rationalize: bool,
}

impl DiffOptions {
    /// Options with everything disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with everything enabled.
    pub fn all() -> Self {
        Self {
            invertible: true,
            factorize: true,
            rationalize: true,
        }
    }

    pub fn invertible(mut self) -> Self {
        self.invertible = true;
        self
    }

    pub fn factorize(mut self) -> Self {
        self.factorize = true;
        self
    }

    pub fn rationalize(mut self) -> Self {
        self.rationalize = true;
        self
    }

    /// Load options from a TOML table. Missing keys default to `false`.
    pub fn from_toml_str(text: &str) -> DiffResult<Self> {
        toml::from_str(text).map_err(|e| DiffError::Config(e.to_string()))
    }
}
