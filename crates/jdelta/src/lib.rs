//! Structural JSON diff producing RFC 6902 patches.
//!
//! Unified entry point over the jdelta crates. Most callers only need
//! [`diff_str`] or [`diff_serialize`] and a [`DiffOptions`].
//!
//! ```
//! use jdelta::{diff_str, DiffOptions};
//!
//! let patch = diff_str(r#"{"a": 1}"#, r#"{"b": 1}"#, &DiffOptions::new().factorize()).unwrap();
//! assert_eq!(patch.to_string(), r#"{"op":"move","from":"/a","path":"/b"}"#);
//! ```

pub mod error;

pub use error::{DeltaError, DeltaResult};

// Re-export key types
pub use jdelta_diff::{diff, diff_json, DiffError, DiffOptions, Differ};
pub use jdelta_hash::{digest, StructuralHasher, ValueHash};
pub use jdelta_types::{
    escape, unescape, Operation, OperationKind, Patch, PatchError, Pointer, TypeError, Value,
    ValueKind, DEFAULT_SEPARATOR,
};

use serde::Serialize;
use tracing::debug;

/// Diff two JSON documents given as text.
pub fn diff_str(before: &str, after: &str, options: &DiffOptions) -> DeltaResult<Patch> {
    let before: Value = serde_json::from_str(before)?;
    let after: Value = serde_json::from_str(after)?;
    Ok(diff(&before, &after, options))
}

/// Diff two serializable values through their JSON representation.
pub fn diff_serialize<B, A>(before: &B, after: &A, options: &DiffOptions) -> DeltaResult<Patch>
where
    B: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    let before = Value::from_serialize(before)?;
    let after = Value::from_serialize(after)?;
    Ok(diff(&before, &after, options))
}

/// Diff, then derive the patch that undoes it.
///
/// Returns `(forward, backward)`. The forward patch always carries `test`
/// guards since `invertible` is forced on.
pub fn diff_reversible(
    before: &Value,
    after: &Value,
    options: &DiffOptions,
) -> DeltaResult<(Patch, Patch)> {
    let forward = diff(before, after, &options.invertible());
    let backward = forward.invert()?;
    debug!(forward = forward.len(), backward = backward.len(), "reversible diff");
    Ok((forward, backward))
}
