mod common;

use common::{apply, v};
use jdelta_diff::{diff, diff_json, DiffOptions};
use jdelta_types::OperationKind;
use serde_json::json;

#[test]
fn renamed_member_becomes_move() {
    let before = v(json!({"a": {"deep": [1, 2, 3]}, "z": 0}));
    let after = v(json!({"b": {"deep": [1, 2, 3]}, "z": 0}));

    let patch = diff(&before, &after, &DiffOptions::new().factorize());
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        json!([{"op": "move", "from": "/a", "path": "/b"}])
    );
    assert_eq!(apply(&before, &patch).unwrap(), after);
}

#[test]
fn duplicated_member_becomes_copy() {
    let before = v(json!({"src": {"k": [true, null]}}));
    let after = v(json!({"src": {"k": [true, null]}, "dst": {"k": [true, null]}}));

    let patch = diff(&before, &after, &DiffOptions::new().factorize());
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        json!([{"op": "copy", "from": "/src", "path": "/dst"}])
    );
    assert_eq!(apply(&before, &patch).unwrap(), after);
}

#[test]
fn shuffled_config_round_trips_through_moves() {
    let before = v(json!({
        "servers": [{"host": "a", "port": 80}, {"host": "b", "port": 81}],
        "limits": {"rps": 10, "burst": 20},
        "tags": ["x", "y", "z"],
    }));
    let after = v(json!({
        "servers": [{"host": "a", "port": 8080}],
        "quotas": {"rps": 10, "burst": 20},
        "tags": ["x", "y"],
        "backup": {"host": "b", "port": 81},
    }));

    let patch = diff(&before, &after, &DiffOptions::new().invertible().factorize());
    assert_eq!(apply(&before, &patch).unwrap(), after);
    assert_eq!(patch.count(OperationKind::Move), 2, "{patch}");
    assert_eq!(patch.count(OperationKind::Add), 0, "{patch}");

    let inverse = patch.invert().unwrap();
    assert_eq!(apply(&after, &inverse).unwrap(), before);
}

#[test]
fn options_from_toml_drive_the_diff() {
    let options = DiffOptions::from_toml_str("invertible = true").unwrap();
    let patch = diff(&v(json!({"a": 1})), &v(json!({})), &options);
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        json!([
            {"op": "test", "path": "/a", "value": 1},
            {"op": "remove", "path": "/a"},
        ])
    );
}

#[test]
fn rationalize_collapses_rewritten_array() {
    let before = v(json!({"list": [1, 2, 3]}));
    let after = v(json!({"list": [4, 5, 6]}));

    let naive = diff(&before, &after, &DiffOptions::new());
    let rational = diff(&before, &after, &DiffOptions::new().rationalize());
    assert_eq!(naive.len(), 3);
    assert_eq!(
        serde_json::to_value(&rational).unwrap(),
        json!([{"op": "replace", "path": "/list", "value": [4, 5, 6]}])
    );
}

#[test]
fn custom_separator_rendering() {
    let patch = diff(
        &v(json!({"a": {"b/c": 1}})),
        &v(json!({"a": {"b/c": 2}})),
        &DiffOptions::new(),
    );
    let op = patch.get(0).unwrap();
    assert_eq!(op.path.render("/"), "/a/b~1c");
    assert_eq!(op.path.render("."), ".a.b~1c");
}

#[test]
fn json_entry_point_matches_value_entry_point() {
    let before = json!({"n": [1, 2], "s": "x"});
    let after = json!({"n": [1], "s": "y"});
    let options = DiffOptions::all();

    let from_json = diff_json(&before, &after, &options).unwrap();
    let from_values = diff(&v(before), &v(after), &options);
    assert_eq!(from_json, from_values);
}
