//! RFC 6902 JSON Patch operations.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::pointer::Pointer;
use crate::value::Value;

/// The six JSON Patch operation types (RFC 6902 §4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Add,
    Replace,
    Remove,
    Move,
    Copy,
    Test,
}

impl OperationKind {
    /// The wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Replace => "replace",
            OperationKind::Remove => "remove",
            OperationKind::Move => "move",
            OperationKind::Copy => "copy",
            OperationKind::Test => "test",
        }
    }

    /// Whether the operation carries a `from` pointer on the wire.
    pub fn has_from(&self) -> bool {
        matches!(self, OperationKind::Move | OperationKind::Copy)
    }

    /// Whether the operation carries a `value` on the wire.
    pub fn has_value(&self) -> bool {
        matches!(
            self,
            OperationKind::Add | OperationKind::Replace | OperationKind::Test
        )
    }

    /// Whether applying the operation changes the document.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, OperationKind::Test)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single patch operation.
///
/// The in-memory form may carry fields the wire form drops: `old_value` is
/// never serialized, and `from`/`value` are only emitted for the kinds that
/// define them.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    /// Target location, serialized as `path`.
    pub path: Pointer,
    /// Source location for `move` and `copy`.
    pub from: Option<Pointer>,
    /// New value for `add`, `replace` and `test`; the transferred value for
    /// `move` and `copy`.
    pub value: Option<Value>,
    /// The value replaced or removed, or overwritten by a `move`/`copy`
    /// target. Used to invert patches.
    pub old_value: Option<Value>,
}

impl Operation {
    pub fn add(path: Pointer, value: Value) -> Self {
        Self::new(OperationKind::Add, None, path, None, Some(value))
    }

    pub fn remove(path: Pointer, old_value: Value) -> Self {
        Self::new(OperationKind::Remove, None, path, Some(old_value), None)
    }

    pub fn replace(path: Pointer, old_value: Value, value: Value) -> Self {
        Self::new(OperationKind::Replace, None, path, Some(old_value), Some(value))
    }

    pub fn test(path: Pointer, value: Value) -> Self {
        Self::new(OperationKind::Test, None, path, None, Some(value))
    }

    /// A `move` from `from` to `path`.
    ///
    /// `moved` is the relocated value and `overwritten` the value previously
    /// at `path`, if any. Neither is serialized; both are kept for inversion.
    pub fn move_from(from: Pointer, path: Pointer, moved: Value, overwritten: Option<Value>) -> Self {
        Self::new(OperationKind::Move, Some(from), path, overwritten, Some(moved))
    }

    /// A `copy` from `from` to `path`, with the same bookkeeping as
    /// [`Operation::move_from`].
    pub fn copy_from(from: Pointer, path: Pointer, copied: Value, overwritten: Option<Value>) -> Self {
        Self::new(OperationKind::Copy, Some(from), path, overwritten, Some(copied))
    }

    pub fn new(
        kind: OperationKind,
        from: Option<Pointer>,
        path: Pointer,
        old_value: Option<Value>,
        value: Option<Value>,
    ) -> Self {
        Self {
            kind,
            path,
            from,
            value,
            old_value,
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let from = self.from.as_ref().filter(|_| self.kind.has_from());
        let value = self.value.as_ref().filter(|_| self.kind.has_value());
        if self.kind.has_from() && from.is_none() {
            return Err(serde::ser::Error::custom(format!(
                "{} operation without source pointer",
                self.kind
            )));
        }

        let len = 2 + usize::from(from.is_some()) + usize::from(self.kind.has_value());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("op", &self.kind)?;
        if let Some(from) = from {
            map.serialize_entry("from", from)?;
        }
        map.serialize_entry("path", &self.path)?;
        if self.kind.has_value() {
            // A missing value on add/replace/test means JSON null.
            map.serialize_entry("value", value.unwrap_or(&Value::Null))?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireOperation {
    op: OperationKind,
    path: Pointer,
    #[serde(default)]
    from: Option<Pointer>,
    #[serde(default)]
    value: Option<Value>,
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireOperation::deserialize(deserializer)?;
        if wire.op.has_from() && wire.from.is_none() {
            return Err(serde::de::Error::missing_field("from"));
        }
        let value = match (wire.op.has_value(), wire.value) {
            (true, None) => Some(Value::Null),
            (true, value) => value,
            (false, _) => None,
        };
        Ok(Operation {
            kind: wire.op,
            path: wire.path,
            from: wire.from.filter(|_| wire.op.has_from()),
            value,
            old_value: None,
        })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => f.write_str("<invalid operation>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ptr(text: &str) -> Pointer {
        Pointer::parse(text).unwrap()
    }

    #[test]
    fn add_wire_form() {
        let op = Operation::add(ptr("/a/0"), Value::from("x"));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "add", "path": "/a/0", "value": "x"})
        );
    }

    #[test]
    fn remove_omits_value_and_old_value() {
        let op = Operation::remove(ptr("/gone"), Value::from(42));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "remove", "path": "/gone"})
        );
    }

    #[test]
    fn replace_omits_from_even_if_set() {
        let mut op = Operation::replace(ptr(""), Value::from(1), Value::from("a"));
        op.from = Some(ptr("/stale"));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "replace", "path": "", "value": "a"})
        );
    }

    #[test]
    fn move_and_copy_omit_value() {
        let op = Operation::move_from(ptr("/a"), ptr("/b"), Value::from(1), None);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "move", "from": "/a", "path": "/b"})
        );

        let op = Operation::copy_from(ptr("/a"), ptr("/c"), Value::Null, Some(Value::from(2)));
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "copy", "from": "/a", "path": "/c"})
        );
    }

    #[test]
    fn test_with_null_value_keeps_value_field() {
        let op = Operation::test(ptr("/n"), Value::Null);
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            json!({"op": "test", "path": "/n", "value": null})
        );
    }

    #[test]
    fn display_uses_wire_form() {
        let op = Operation::add(ptr("/k"), Value::Bool(true));
        assert_eq!(op.to_string(), r#"{"op":"add","path":"/k","value":true}"#);
    }

    #[test]
    fn display_degrades_to_sentinel() {
        let op = Operation::new(OperationKind::Move, None, ptr("/b"), None, None);
        assert_eq!(op.to_string(), "<invalid operation>");
    }

    #[test]
    fn deserialize_from_wire() {
        let op: Operation =
            serde_json::from_value(json!({"op": "copy", "from": "/a", "path": "/b"})).unwrap();
        assert_eq!(op.kind, OperationKind::Copy);
        assert_eq!(op.from, Some(ptr("/a")));
        assert_eq!(op.value, None);

        let err = serde_json::from_value::<Operation>(json!({"op": "move", "path": "/b"}));
        assert!(err.is_err());
    }
}
