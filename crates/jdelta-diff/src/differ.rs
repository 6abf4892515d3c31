//! The recursive structural differ.
//!
//! [`Differ`] walks `before` and `after` in lock-step and accumulates the
//! operations that turn one into the other. Objects are compared key by key
//! in sorted key order; arrays are compared by position. Rationalization runs
//! bottom-up during the walk, factorization and test pruning run over the
//! finished patch.
//!
//! # Invariants
//!
//! - Applying the patch in order to `before` yields a value equal to `after`.
//! - Trailing array removals are emitted in descending index order so that
//!   no removal shifts the target of a later one.
//! - With `invertible`, every `remove` and `replace` is immediately preceded
//!   by a `test` of the value it discards.

use std::collections::HashMap;

use tracing::{debug, trace};

use jdelta_hash::StructuralHasher;
use jdelta_types::{Operation, Patch, Pointer, Value};

use crate::factorize::factorize;
use crate::options::DiffOptions;
use crate::rationalize::{prefer_replace, prune_redundant_tests};

/// Computes patches between value trees.
#[derive(Clone, Debug, Default)]
pub struct Differ {
    options: DiffOptions,
    hasher: StructuralHasher,
}

impl Differ {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            hasher: StructuralHasher::default(),
        }
    }

    /// Use a custom hasher for factorization.
    pub fn with_hasher(mut self, hasher: StructuralHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compute the patch transforming `before` into `after`.
    pub fn diff(&self, before: &Value, after: &Value) -> Patch {
        let mut walk = Walk {
            options: &self.options,
            patch: Patch::new(),
        };
        walk.compare(&Pointer::root(), before, after);
        let mut patch = walk.patch;
        let naive_len = patch.len();

        if self.options.factorize {
            factorize(&mut patch, before, &self.hasher);
        }
        if self.options.rationalize {
            prune_redundant_tests(&mut patch);
        }

        debug!(
            ops = patch.len(),
            naive_ops = naive_len,
            invertible = self.options.invertible,
            factorize = self.options.factorize,
            rationalize = self.options.rationalize,
            "diff complete"
        );
        patch
    }
}

/// Compute the patch transforming `before` into `after`.
pub fn diff(before: &Value, after: &Value, options: &DiffOptions) -> Patch {
    Differ::new(*options).diff(before, after)
}

/// State of one diff walk.
struct Walk<'o> {
    options: &'o DiffOptions,
    patch: Patch,
}

impl Walk<'_> {
    fn compare(&mut self, ptr: &Pointer, src: &Value, tgt: &Value) {
        match (src, tgt) {
            (Value::Object(a), Value::Object(b)) => {
                self.compare_container(ptr, src, tgt, |walk| walk.compare_objects(ptr, a, b));
            }
            (Value::Array(a), Value::Array(b)) => {
                self.compare_container(ptr, src, tgt, |walk| walk.compare_arrays(ptr, a, b));
            }
            _ if src == tgt => {}
            _ => self.replace(ptr, src, tgt),
        }
    }

    /// Diff two same-kind containers, then keep whichever of the nested
    /// operations or a single `replace` is shorter when rationalizing.
    fn compare_container(
        &mut self,
        ptr: &Pointer,
        src: &Value,
        tgt: &Value,
        nested: impl FnOnce(&mut Self),
    ) {
        let start = self.patch.len();
        nested(self);
        if !self.options.rationalize {
            return;
        }

        let nested_ops = self.patch.len() - start;
        let replace_ops = self.replace_cost();
        if prefer_replace(nested_ops, replace_ops) {
            trace!(path = %ptr, nested_ops, replace_ops, "collapsing subtree into replace");
            self.patch.truncate(start);
            self.replace(ptr, src, tgt);
        }
    }

    fn compare_objects(
        &mut self,
        ptr: &Pointer,
        src: &HashMap<String, Value>,
        tgt: &HashMap<String, Value>,
    ) {
        let mut keys: Vec<&String> = src
            .keys()
            .chain(tgt.keys().filter(|k| !src.contains_key(*k)))
            .collect();
        keys.sort();

        for key in keys {
            let child = ptr.append_key(key);
            match (src.get(key), tgt.get(key)) {
                (Some(s), Some(t)) => self.compare(&child, s, t),
                (Some(s), None) => self.remove(child, s),
                (None, Some(t)) => self.add(child, t),
                (None, None) => {}
            }
        }
    }

    fn compare_arrays(&mut self, ptr: &Pointer, src: &[Value], tgt: &[Value]) {
        let common = src.len().min(tgt.len());
        for (i, (s, t)) in src.iter().zip(tgt).enumerate() {
            self.compare(&ptr.append_index(i), s, t);
        }
        for (i, t) in tgt.iter().enumerate().skip(common) {
            self.add(ptr.append_index(i), t);
        }
        for (i, s) in src.iter().enumerate().skip(common).rev() {
            self.remove(ptr.append_index(i), s);
        }
    }

    fn add(&mut self, ptr: Pointer, value: &Value) {
        self.patch.push(Operation::add(ptr, value.clone()));
    }

    fn remove(&mut self, ptr: Pointer, old: &Value) {
        if self.options.invertible {
            self.patch.push(Operation::test(ptr.clone(), old.clone()));
        }
        self.patch.push(Operation::remove(ptr, old.clone()));
    }

    fn replace(&mut self, ptr: &Pointer, old: &Value, new: &Value) {
        if self.options.invertible {
            self.patch.push(Operation::test(ptr.clone(), old.clone()));
        }
        self.patch
            .push(Operation::replace(ptr.clone(), old.clone(), new.clone()));
    }

    fn replace_cost(&self) -> usize {
        if self.options.invertible {
            2
        } else {
            1
        }
    }
}
