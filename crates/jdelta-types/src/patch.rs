//! An ordered sequence of patch operations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::operation::{Operation, OperationKind};
use crate::pointer::Pointer;
use crate::value::Value;

/// A JSON Patch: operations in application order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    operations: Vec<Operation>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Number of operations of the given kind.
    pub fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind == kind).count()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operations_mut(&mut self) -> &mut [Operation] {
        &mut self.operations
    }

    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Operation> {
        self.operations.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Operation> {
        self.operations.iter_mut()
    }

    /// Append a fully built operation.
    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Append an operation assembled from its parts.
    pub fn append(
        &mut self,
        kind: OperationKind,
        from: Option<Pointer>,
        path: Pointer,
        old_value: Option<Value>,
        value: Option<Value>,
    ) {
        self.push(Operation::new(kind, from, path, old_value, value));
    }

    /// Remove the operation at `index`, shifting later operations down by
    /// one. Survivors keep their relative order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Operation {
        self.operations.remove(index)
    }

    /// Shorten the patch to its first `len` operations.
    pub fn truncate(&mut self, len: usize) {
        self.operations.truncate(len);
    }

    /// Keep only the operations for which `keep` returns `true`.
    pub fn retain(&mut self, keep: impl FnMut(&Operation) -> bool) {
        self.operations.retain(keep);
    }

    /// Build the patch that undoes this one.
    ///
    /// Operations are visited in reverse. `add` becomes `remove`, `remove`
    /// becomes `add` of the recorded old value, `replace` restores the old
    /// value, `move` swaps its endpoints and `copy` becomes a `remove` of the
    /// copy. A `move` or `copy` that overwrote a value restores it. Every
    /// emitted `remove` and `replace` is preceded by a `test` of the value it
    /// expects to find. Existing `test` operations are dropped.
    pub fn invert(&self) -> Result<Patch, PatchError> {
        let mut inverse = Patch::new();
        for (index, op) in self.operations.iter().enumerate().rev() {
            let old_value = || {
                op.old_value
                    .clone()
                    .ok_or(PatchError::MissingOldValue { index })
            };
            let source = || op.from.clone().ok_or(PatchError::MissingSource { index });
            let moved_value = || op.value.clone().ok_or(PatchError::MissingValue { index });

            match op.kind {
                OperationKind::Test => {}
                OperationKind::Add => {
                    let value = op.value.clone().unwrap_or_default();
                    inverse.push(Operation::test(op.path.clone(), value.clone()));
                    inverse.push(Operation::remove(op.path.clone(), value));
                }
                OperationKind::Remove => {
                    inverse.push(Operation::add(op.path.clone(), old_value()?));
                }
                OperationKind::Replace => {
                    let value = op.value.clone().unwrap_or_default();
                    inverse.push(Operation::test(op.path.clone(), value.clone()));
                    inverse.push(Operation::replace(op.path.clone(), value, old_value()?));
                }
                OperationKind::Move => {
                    let from = source()?;
                    let moved = moved_value()?;
                    inverse.push(Operation::move_from(op.path.clone(), from, moved, None));
                    if let Some(overwritten) = &op.old_value {
                        inverse.push(Operation::add(op.path.clone(), overwritten.clone()));
                    }
                }
                OperationKind::Copy => {
                    source()?;
                    let copied = moved_value()?;
                    inverse.push(Operation::test(op.path.clone(), copied.clone()));
                    match &op.old_value {
                        Some(overwritten) => inverse.push(Operation::replace(
                            op.path.clone(),
                            copied,
                            overwritten.clone(),
                        )),
                        None => inverse.push(Operation::remove(op.path.clone(), copied)),
                    }
                }
            }
        }
        Ok(inverse)
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, op) in self.operations.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            write!(f, "{op}")?;
        }
        Ok(())
    }
}

impl From<Vec<Operation>> for Patch {
    fn from(operations: Vec<Operation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<Operation> for Patch {
    fn from_iter<I: IntoIterator<Item = Operation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Patch {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ptr(text: &str) -> Pointer {
        Pointer::parse(text).unwrap()
    }

    fn sample() -> Patch {
        let mut patch = Patch::new();
        patch.append(OperationKind::Add, None, ptr("/a"), None, Some(Value::from(1)));
        patch.append(OperationKind::Remove, None, ptr("/b"), Some(Value::from(2)), None);
        patch.append(
            OperationKind::Replace,
            None,
            ptr("/c"),
            Some(Value::from(3)),
            Some(Value::from(4)),
        );
        patch
    }

    #[test]
    fn empty_patch() {
        let patch = Patch::new();
        assert!(patch.is_empty());
        assert_eq!(patch.len(), 0);
        assert_eq!(patch.to_string(), "");
    }

    #[test]
    fn remove_at_preserves_order() {
        let mut patch = sample();
        let removed = patch.remove_at(1);
        assert_eq!(removed.kind, OperationKind::Remove);
        let kinds: Vec<_> = patch.iter().map(|op| op.kind).collect();
        assert_eq!(kinds, vec![OperationKind::Add, OperationKind::Replace]);
    }

    #[test]
    fn counts_by_kind() {
        let patch = sample();
        assert_eq!(patch.count(OperationKind::Add), 1);
        assert_eq!(patch.count(OperationKind::Move), 0);
    }

    #[test]
    fn display_joins_with_newlines() {
        let patch = sample();
        let text = patch.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], r#"{"op":"remove","path":"/b"}"#);
    }

    #[test]
    fn serializes_as_array() {
        let patch = sample();
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!([
                {"op": "add", "path": "/a", "value": 1},
                {"op": "remove", "path": "/b"},
                {"op": "replace", "path": "/c", "value": 4},
            ])
        );
    }

    #[test]
    fn iter_mut_edits_in_place() {
        let mut patch = sample();
        for op in patch.iter_mut() {
            op.old_value = None;
        }
        assert!(patch.iter().all(|op| op.old_value.is_none()));
    }

    #[test]
    fn invert_reverses_and_swaps() {
        let mut patch = sample();
        patch.push(Operation::move_from(ptr("/x"), ptr("/y"), Value::from(5), None));
        let inverse = patch.invert().unwrap();
        assert_eq!(
            serde_json::to_value(&inverse).unwrap(),
            json!([
                {"op": "move", "from": "/y", "path": "/x"},
                {"op": "test", "path": "/c", "value": 4},
                {"op": "replace", "path": "/c", "value": 3},
                {"op": "add", "path": "/b", "value": 2},
                {"op": "test", "path": "/a", "value": 1},
                {"op": "remove", "path": "/a"},
            ])
        );
    }

    #[test]
    fn invert_restores_overwritten_targets() {
        let mut patch = Patch::new();
        patch.push(Operation::move_from(
            ptr("/a"),
            ptr("/b"),
            Value::from("moved"),
            Some(Value::Null),
        ));
        patch.push(Operation::copy_from(
            ptr("/c"),
            ptr("/d"),
            Value::from(7),
            Some(Value::from(8)),
        ));
        let inverse = patch.invert().unwrap();
        assert_eq!(
            serde_json::to_value(&inverse).unwrap(),
            json!([
                {"op": "test", "path": "/d", "value": 7},
                {"op": "replace", "path": "/d", "value": 8},
                {"op": "move", "from": "/b", "path": "/a"},
                {"op": "add", "path": "/b", "value": null},
            ])
        );
    }

    #[test]
    fn invert_requires_old_values() {
        let mut patch = Patch::new();
        patch.append(OperationKind::Remove, None, ptr("/b"), None, None);
        assert_eq!(
            patch.invert(),
            Err(PatchError::MissingOldValue { index: 0 })
        );
    }
}
