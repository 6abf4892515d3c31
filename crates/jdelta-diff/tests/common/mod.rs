//! Shared helpers for the integration tests: a minimal RFC 6902 applier and
//! value generators.

#![allow(dead_code)]

use jdelta_types::{parse_index, OperationKind, Patch, Pointer, Value};
use proptest::prelude::*;

/// Apply `patch` to a copy of `doc`, in order.
pub fn apply(doc: &Value, patch: &Patch) -> Result<Value, String> {
    let mut doc = doc.clone();
    for (i, op) in patch.iter().enumerate() {
        let step = match op.kind {
            OperationKind::Add => add(&mut doc, &op.path, value_of(op.value.as_ref())),
            OperationKind::Remove => remove(&mut doc, &op.path).map(|_| ()),
            OperationKind::Replace => replace(&mut doc, &op.path, value_of(op.value.as_ref())),
            OperationKind::Move => {
                let from = op.from.as_ref().ok_or("move without from")?;
                remove(&mut doc, from).and_then(|v| add(&mut doc, &op.path, v))
            }
            OperationKind::Copy => {
                let from = op.from.as_ref().ok_or("copy without from")?;
                let v = doc.pointer(from).cloned().ok_or("copy source missing")?;
                add(&mut doc, &op.path, v)
            }
            OperationKind::Test => match doc.pointer(&op.path) {
                Some(actual) if actual == &value_of(op.value.as_ref()) => Ok(()),
                other => Err(format!("test failed: found {other:?}")),
            },
        };
        step.map_err(|e| format!("op #{i} ({op}): {e}"))?;
    }
    Ok(doc)
}

fn value_of(value: Option<&Value>) -> Value {
    value.cloned().unwrap_or_default()
}

fn split(path: &Pointer) -> Result<(Pointer, String), String> {
    match (path.parent(), path.last()) {
        (Some(parent), Some(last)) => Ok((parent, last)),
        _ => Err("root has no parent".into()),
    }
}

fn add(doc: &mut Value, path: &Pointer, value: Value) -> Result<(), String> {
    if path.is_root() {
        *doc = value;
        return Ok(());
    }
    let (parent, last) = split(path)?;
    match doc.pointer_mut(&parent) {
        Some(Value::Object(map)) => {
            map.insert(last, value);
            Ok(())
        }
        Some(Value::Array(items)) => {
            let index = if last == "-" {
                items.len()
            } else {
                parse_index(&last).ok_or("bad index")?
            };
            if index > items.len() {
                return Err(format!("index {index} out of bounds"));
            }
            items.insert(index, value);
            Ok(())
        }
        _ => Err(format!("no container at {parent}")),
    }
}

fn remove(doc: &mut Value, path: &Pointer) -> Result<Value, String> {
    let (parent, last) = split(path)?;
    match doc.pointer_mut(&parent) {
        Some(Value::Object(map)) => map.remove(&last).ok_or_else(|| format!("no member {last}")),
        Some(Value::Array(items)) => {
            let index = parse_index(&last).ok_or("bad index")?;
            if index >= items.len() {
                return Err(format!("index {index} out of bounds"));
            }
            Ok(items.remove(index))
        }
        _ => Err(format!("no container at {parent}")),
    }
}

fn replace(doc: &mut Value, path: &Pointer, value: Value) -> Result<(), String> {
    let node = doc
        .pointer_mut(path)
        .ok_or_else(|| format!("nothing at {path}"))?;
    *node = value;
    Ok(())
}

/// Small value trees with a narrow key space, so that random pairs share
/// structure and produce moves, copies and nested changes.
pub fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-3i32..3).prop_map(Value::from),
        (-12i32..12).prop_map(|q| Value::Number(f64::from(q) / 4.0)),
        prop_oneof![Just(0.0), Just(-0.0)].prop_map(Value::Number),
        "[xy]{0,2}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map("[ab~/]{1,2}", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

pub fn v(json: serde_json::Value) -> Value {
    Value::try_from(json).unwrap()
}
