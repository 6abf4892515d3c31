//! Foundation types for jdelta.
//!
//! This crate provides the value model, the RFC 6901 pointer algebra and the
//! RFC 6902 operation/patch model shared by every other jdelta crate.
//!
//! # Key Types
//!
//! - [`Value`] -- Closed tree over null, booleans, numbers, strings, arrays and objects
//! - [`Pointer`] -- Immutable, escaped JSON Pointer
//! - [`Operation`] / [`OperationKind`] -- One JSON Patch operation
//! - [`Patch`] -- Ordered operation sequence, invertible when old values are recorded

pub mod error;
pub mod operation;
pub mod patch;
pub mod pointer;
pub mod value;

pub use error::{PatchError, TypeError};
pub use operation::{Operation, OperationKind};
pub use patch::Patch;
pub use pointer::{escape, unescape, Pointer, DEFAULT_SEPARATOR};
pub use value::{parse_index, Value, ValueKind};
