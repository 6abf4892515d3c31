//! Structural content hashing for jdelta.
//!
//! Provides a BLAKE3-based, order-aware digest over [`jdelta_types::Value`]
//! trees. Digests are a pre-filter for equality: equal values always hash
//! equal, but callers must confirm a hash match with a structural comparison.

pub mod hasher;

pub use hasher::{digest, StructuralHasher, ValueHash};
