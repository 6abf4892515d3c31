//! Move/copy detection over a finished patch.
//!
//! Each `add` (and each `replace` of an object member) is matched against
//! the `remove`s of the same patch. A removal whose value is equal merges
//! with it into one `move`; otherwise a node of `before` that no operation
//! touches and that holds an equal value becomes the source of a `copy`.
//! Digests narrow the candidates and a structural comparison confirms them.
//!
//! Merging relocates one half of the pair to the other's position. That is
//! only done when no operation in between inserts into or removes from the
//! same array, since those would shift the relocated index.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use jdelta_hash::{StructuralHasher, ValueHash};
use jdelta_types::{Operation, OperationKind, Patch, Pointer, Value};

/// Rewrite `patch` in place, merging remove/add pairs into moves and
/// redundant additions into copies.
///
/// Runs in time quadratic in the number of operations.
pub(crate) fn factorize(patch: &mut Patch, before: &Value, hasher: &StructuralHasher) {
    if !patch.iter().any(|op| is_target(op, before)) {
        return;
    }

    let sources = CopySources::collect(patch, before, hasher);
    let mut removed: Vec<Option<ValueHash>> = patch
        .iter()
        .map(|op| match (op.kind, &op.old_value) {
            (OperationKind::Remove, Some(old)) => Some(hasher.digest(old)),
            _ => None,
        })
        .collect();

    let mut i = 0;
    while i < patch.len() {
        let op = &patch.operations()[i];
        if !is_target(op, before) {
            i += 1;
            continue;
        }
        let Some(value) = op.value.clone() else {
            i += 1;
            continue;
        };
        let hash = hasher.digest(&value);

        if let Some(j) = find_removal(patch, &removed, i, hash, &value, before) {
            i = merge(patch, &mut removed, i, j, value);
            continue;
        }

        if let Some(from) = sources.find(hash, &value) {
            let target = &mut patch.operations_mut()[i];
            debug!(from = %from, path = %target.path, "factorized addition into copy");
            let overwritten = target.old_value.take();
            *target = Operation::copy_from(from.clone(), target.path.clone(), value, overwritten);
        }
        i += 1;
    }
}

/// Operations that may become the destination of a move or copy.
///
/// A `replace` qualifies only under an object: inside an array, the `add`
/// half of a move would insert rather than overwrite.
fn is_target(op: &Operation, before: &Value) -> bool {
    match op.kind {
        OperationKind::Add => true,
        OperationKind::Replace => parent_kind_is_object(&op.path, before),
        _ => false,
    }
}

fn parent_kind_is_object(path: &Pointer, before: &Value) -> bool {
    path.parent()
        .and_then(|parent| before.pointer(&parent))
        .is_some_and(|node| matches!(node, Value::Object(_)))
}

/// The first removal, in patch order, that can merge with the target at
/// `target`.
fn find_removal(
    patch: &Patch,
    removed: &[Option<ValueHash>],
    target: usize,
    hash: ValueHash,
    value: &Value,
    before: &Value,
) -> Option<usize> {
    let path = &patch.operations()[target].path;
    removed.iter().enumerate().find_map(|(j, h)| {
        if *h != Some(hash) {
            return None;
        }
        let op = &patch.operations()[j];
        if op.old_value.as_ref() != Some(value) || op.path.is_ancestor_of(path) {
            return None;
        }
        let (lo, hi) = if j < target { (j, target) } else { (target, j) };
        can_delay(patch, lo, hi, before).then_some(j)
    })
}

/// Whether the operation at `lo` can execute at position `hi` instead.
///
/// Operations in between that insert into or remove from the array holding
/// the delayed operation's target would shift its index.
fn can_delay(patch: &Patch, lo: usize, hi: usize, before: &Value) -> bool {
    let ops = patch.operations();
    let Some(parent) = ops[lo].path.parent() else {
        return false;
    };
    if !matches!(before.pointer(&parent), Some(Value::Array(_))) {
        return true;
    }
    ops[lo + 1..hi].iter().all(|op| !shifts_children_of(op, &parent))
}

fn shifts_children_of(op: &Operation, parent: &Pointer) -> bool {
    match op.kind {
        OperationKind::Add | OperationKind::Remove | OperationKind::Copy => {
            op.path.is_child_of(parent)
        }
        OperationKind::Move => {
            op.path.is_child_of(parent)
                || op.from.as_ref().is_some_and(|from| from.is_child_of(parent))
        }
        OperationKind::Replace | OperationKind::Test => false,
    }
}

/// Merge the target at `target` with the removal at `removal`. Returns the
/// index of the next unvisited operation.
///
/// A pair at the same pointer cancels out. The walk never emits one, but
/// hand-built patches can.
fn merge(
    patch: &mut Patch,
    removed: &mut Vec<Option<ValueHash>>,
    target: usize,
    removal: usize,
    value: Value,
) -> usize {
    let from = patch.operations()[removal].path.clone();
    let path = patch.operations()[target].path.clone();

    if from == path {
        debug!(path = %path, "factorized remove/add pair into no-op");
        let (lo, hi) = (target.min(removal), target.max(removal));
        patch.remove_at(hi);
        removed.remove(hi);
        patch.remove_at(lo);
        removed.remove(lo);
        return if removal < target { target - 1 } else { target };
    }

    debug!(from = %from, path = %path, "factorized remove/add pair into move");
    let overwritten = patch.operations()[target].old_value.clone();
    let moved = Operation::move_from(from, path, value, overwritten);
    let (lo, hi) = (target.min(removal), target.max(removal));
    patch.operations_mut()[hi] = moved;
    removed[hi] = None;
    patch.remove_at(lo);
    removed.remove(lo);
    target
}

/// Nodes of `before` that survive unchanged into `after`, indexed by digest.
struct CopySources<'v> {
    by_hash: HashMap<ValueHash, Vec<(Pointer, &'v Value)>>,
}

impl<'v> CopySources<'v> {
    /// A node qualifies when no mutating operation addresses it, one of its
    /// ancestors, or one of its descendants.
    fn collect(patch: &Patch, before: &'v Value, hasher: &StructuralHasher) -> Self {
        let mut touched = HashSet::new();
        for op in patch.iter().filter(|op| op.kind.is_mutation()) {
            touched.insert(op.path.clone());
            if let Some(from) = &op.from {
                touched.insert(from.clone());
            }
        }
        let mut dirty = HashSet::new();
        for ptr in &touched {
            let mut cursor = Some(ptr.clone());
            while let Some(p) = cursor {
                cursor = p.parent();
                if !dirty.insert(p) {
                    break;
                }
            }
        }

        let mut sources = Self {
            by_hash: HashMap::new(),
        };
        sources.walk(before, &Pointer::root(), &touched, &dirty, hasher);
        sources
    }

    fn walk(
        &mut self,
        node: &'v Value,
        ptr: &Pointer,
        touched: &HashSet<Pointer>,
        dirty: &HashSet<Pointer>,
        hasher: &StructuralHasher,
    ) {
        if touched.contains(ptr) {
            return;
        }
        if !dirty.contains(ptr) {
            hasher.index(node, ptr, &mut |p: &Pointer, v: &'v Value, h: ValueHash| {
                self.by_hash.entry(h).or_default().push((p.clone(), v));
            });
            return;
        }
        match node {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.walk(item, &ptr.append_index(i), touched, dirty, hasher);
                }
            }
            Value::Object(map) => {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    self.walk(&map[key], &ptr.append_key(key), touched, dirty, hasher);
                }
            }
            _ => {}
        }
    }

    fn find(&self, hash: ValueHash, value: &Value) -> Option<&Pointer> {
        self.by_hash
            .get(&hash)?
            .iter()
            .find(|(_, node)| *node == value)
            .map(|(ptr, _)| ptr)
    }
}
