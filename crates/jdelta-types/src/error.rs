use thiserror::Error;

/// Errors produced while building values and pointers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A number that cannot be represented as a 64-bit float.
    #[error("unsupported number: {0}")]
    UnsupportedNumber(String),

    /// Input data outside the null/bool/number/string/array/object model.
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// Pointer text that is not a valid RFC 6901 JSON Pointer.
    #[error("invalid pointer {pointer:?}: {reason}")]
    InvalidPointer { pointer: String, reason: String },
}

/// Errors produced by patch transformations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    /// The operation does not carry the value it replaced or removed.
    #[error("operation #{index} has no recorded old value")]
    MissingOldValue { index: usize },

    /// The operation does not carry the value it adds or transfers.
    #[error("operation #{index} has no recorded value")]
    MissingValue { index: usize },

    /// A move or copy operation without a source pointer.
    #[error("operation #{index} has no source pointer")]
    MissingSource { index: usize },
}
