mod common;

use std::sync::{Arc, Mutex};

use boxed_model::{copy_from_to, copy_values, Model, ModelDef, ModelError, Props, Schema};
use common::{a_defaults, ab_defaults, merged, props, A, B};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

// ── to_request ───────────────────────────────────────────────────

#[test]
fn request_applies_base_hook() {
    let mut a = Model::new(&A);
    a.set("a1", 2);
    a.set("a2", "3");
    a.set("a3", "a3");
    a.set_exists(true);
    a.save();

    assert_eq!(a.to_request(), props(json!({"a1_": 2, "a2": "3", "a3": "a3"})));
}

#[test]
fn request_applies_every_level_hook() {
    let mut b = Model::new(&B);
    b.set("a1", 2);
    b.set("a2", "3");
    b.set("a3", "a3");
    b.set("b1", 4);
    b.set("b2", "4");
    b.set("b3", "b3");
    b.set_exists(true);

    // staged values are read through the accessors
    assert_eq!(
        b.to_request(),
        props(json!({"a1_": 2, "a2": "3", "a3": "a3", "b1_": 4, "b2": "4", "b3": "b3"}))
    );
}

#[test]
fn request_does_not_stage_or_commit() {
    let b = Model::new(&B);
    let request = b.to_request();
    assert_eq!(request.len(), 6);
    assert!(b.dirty().is_none());
}

#[test]
fn hooks_run_base_first() {
    let order = Arc::new(Mutex::new(Vec::new()));

    let base_order = Arc::clone(&order);
    let base = Schema::base()
        .extend(
            ModelDef::new("Base")
                .default_value("x", 1)
                .map_request(move |_, req| {
                    base_order.lock().unwrap().push("base");
                    req.insert("seen".into(), json!(["base"]));
                }),
        )
        .unwrap();

    let derived_order = Arc::clone(&order);
    let derived = base
        .extend(
            ModelDef::new("Derived")
                .default_value("y", 2)
                .map_request(move |_, req| {
                    derived_order.lock().unwrap().push("derived");
                    if let Some(Value::Array(seen)) = req.get_mut("seen") {
                        seen.push(json!("derived"));
                    }
                }),
        )
        .unwrap();

    let request = Model::new(&derived).to_request();
    assert_eq!(*order.lock().unwrap(), ["base", "derived"]);
    assert_eq!(request["seen"], json!(["base", "derived"]));
}

#[test]
fn levels_without_hooks_contribute_nothing() {
    let plain = B
        .extend(ModelDef::new("Plain").default_value("c1", "c"))
        .unwrap();
    let request = Model::new(&plain).to_request();
    assert_eq!(
        request,
        props(json!({"a1_": 0, "a2": "2", "a3": null, "b1_": 0, "b2": "2", "b3": null, "c1": "c"}))
    );
}

// ── load_response ────────────────────────────────────────────────

#[test]
fn loaded_response_waits_for_save() {
    let mut a = Model::new(&A);
    a.load_response(&json!({"a1_": 2, "a2": "3", "a3": "a3"}), true)
        .unwrap();
    assert_eq!(a.props(), Value::Object(a_defaults()));

    a.save();
    assert_eq!(
        a.props(),
        json!({"a1": 2, "a2": "3", "a3": "a3", "exists": true})
    );
}

#[test]
fn loaded_response_maps_every_level() {
    let mut b = Model::new(&B);
    let response = json!({"a1_": 2, "a2": "3", "a3": "a3", "b1_": 4, "b2": "4", "b3": "b3"});
    b.load_response(&response, true).unwrap();
    assert_eq!(b.props(), Value::Object(ab_defaults()));

    b.save();
    assert_eq!(
        b.props(),
        json!({"a1": 2, "a2": "3", "a3": "a3", "b1": 4, "b2": "4", "b3": "b3", "exists": true})
    );
}

#[test]
fn unknown_response_fields_are_ignored() {
    let mut a = Model::new(&A);
    a.load_response(&json!({"a1_": 2, "a2_": "3", "a3_": "a3"}), true)
        .unwrap()
        .save();
    assert_eq!(
        a.props(),
        Value::Object(merged(&a_defaults(), json!({"a1": 2, "exists": true})))
    );

    let mut b = Model::new(&B);
    let response = json!({"a1_": 2, "a2_": "3", "a3_": "a3", "b1_": 4, "b2_": "4", "b3_": "b3"});
    b.load_response(&response, true).unwrap().save();
    assert_eq!(
        b.props(),
        Value::Object(merged(&ab_defaults(), json!({"a1": 2, "b1": 4, "exists": true})))
    );
}

#[test]
fn missing_fields_reset_to_defaults() {
    let mut a = Model::new(&A);
    a.set("a2", "edited");
    a.set("a3", "edited");
    a.save();

    a.load_response(&json!({"a1_": 1}), true).unwrap().save();
    assert_eq!(a.props(), json!({"a1": 1, "a2": "2", "a3": null, "exists": true}));
}

#[test]
fn missing_fields_are_kept_without_clearing() {
    let mut a = Model::new(&A);
    a.set("a2", "edited");
    a.save();

    a.load_response(&json!({"a3": "new"}), false).unwrap().save();
    assert_eq!(a.props(), json!({"a1": 0, "a2": "edited", "a3": "new", "exists": true}));
}

#[test]
fn load_response_discards_earlier_staging() {
    let mut a = Model::new(&A);
    a.set("a2", "staged");
    a.load_response(&json!({"a1_": 3}), false).unwrap();

    assert_eq!(a.get("a2"), Some(json!("2")));
    assert!(a.exists());
    assert!(a.is_dirty(["a1", "exists"]));
    assert!(!a.is_dirty("a2"));
}

#[test]
fn load_response_rejects_non_objects() {
    let mut a = Model::new(&A);
    let err = a.load_response(&json!([1, 2]), true).unwrap_err();
    assert!(matches!(err, ModelError::NotAnObject { role: "source", .. }));
    assert!(err.to_string().starts_with("IllegalArgument,"));
}

#[test]
fn round_trip_restores_copied_props() {
    let schema = Schema::base()
        .extend(
            ModelDef::new("Plain")
                .default_value("n", 0)
                .default_value("s", "")
                .default_value("list", json!([])),
        )
        .unwrap();
    let mut model = Model::new(&schema);
    model.set("n", 5);
    model.set("s", "five");
    model.set("list", json!([5]));
    model.save();
    let before = model.props();

    let request = Value::Object(model.to_request());
    model.load_response(&request, true).unwrap().save();

    let after = model.props();
    for name in schema.copied_props() {
        assert_eq!(after[name], before[name], "{name}");
    }
}

// ── copy routine ─────────────────────────────────────────────────

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn copy_copies_present_and_removes_absent() {
    let src = props(json!({"a": 1, "c": 3}));
    let mut dst = props(json!({"b": 2, "d": 4}));
    copy_from_to(&src, &mut dst, &names(&["a", "b"]), None);
    assert_eq!(dst, props(json!({"a": 1, "d": 4})));
}

#[test]
fn copy_fills_uncopied_defaults() {
    let src = props(json!({"a": 1}));
    let mut dst = Props::new();
    let defaults = props(json!({"a": 0, "b": "b", "list": [1]}));
    copy_from_to(&src, &mut dst, &names(&["a", "b"]), Some(&defaults));
    assert_eq!(dst, props(json!({"a": 1, "b": "b", "list": [1]})));
}

#[test]
fn copy_values_checks_shapes() {
    let mut dst = json!({});
    let err = copy_values(&json!(3), &mut dst, None, None).unwrap_err();
    assert_eq!(err.to_string(), "IllegalArgument, source is not object, got 3");

    let err = copy_values(&json!({}), &mut json!("x"), None, None).unwrap_err();
    assert!(matches!(err, ModelError::NotAnObject { role: "destination", .. }));

    let err = copy_values(&json!({}), &mut dst, Some(&json!("a")), None).unwrap_err();
    assert!(matches!(err, ModelError::NotASequence(_)));
}

#[test]
fn copy_values_copies_listed_names() {
    let mut dst = json!({"stale": true});
    copy_values(
        &json!({"a": 1, "b": 2}),
        &mut dst,
        Some(&json!(["a", "stale"])),
        None,
    )
    .unwrap();
    assert_eq!(dst, json!({"a": 1}));
}
