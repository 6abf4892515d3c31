//! Error types for the diff crate.

use jdelta_types::TypeError;

/// Errors that can occur before or around a diff.
///
/// The diff itself is total over [`jdelta_types::Value`]; failures come from
/// converting caller input into the value model or from loading options.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An input document falls outside the supported value model.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] TypeError),

    /// Diff options could not be parsed.
    #[error("invalid diff options: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
