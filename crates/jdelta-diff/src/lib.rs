//! Structural diff engine for jdelta.
//!
//! Computes the JSON Patch (RFC 6902) that turns one value tree into
//! another, with three composable rewrites:
//!
//! - **invertible** -- `test` guards before every destructive operation
//! - **factorize** -- `move`/`copy` detection through content digests
//! - **rationalize** -- fewest-operations encoding per subtree
//!
//! # Key Types
//!
//! - [`Differ`] / [`diff`] -- The recursive differ
//! - [`DiffOptions`] -- Option set, loadable from TOML
//! - [`DiffError`] / [`DiffResult`] -- Input conversion and config errors

pub mod differ;
pub mod error;
mod factorize;
pub mod options;
mod rationalize;

pub use differ::{diff, Differ};
pub use error::{DiffError, DiffResult};
pub use options::DiffOptions;

use jdelta_types::{Patch, Value};

/// Diff two `serde_json` documents.
///
/// Fails if either document holds a number outside the `f64` range.
pub fn diff_json(
    before: &serde_json::Value,
    after: &serde_json::Value,
    options: &DiffOptions,
) -> DiffResult<Patch> {
    let before = Value::try_from(before.clone())?;
    let after = Value::try_from(after.clone())?;
    Ok(diff(&before, &after, options))
}
