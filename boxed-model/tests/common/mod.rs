//! Shared model fixtures: `A` extends the base model, `B` extends `A`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, LazyLock};

use boxed_model::{Backend, ModelDef, Props, Schema};
use serde_json::{json, Value};

pub static A: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    Schema::base()
        .extend(
            ModelDef::new("A")
                .default_values(a_defaults())
                .map_request(|model, req| {
                    req.shift_remove("a1");
                    if let Some(a1) = model.get("a1") {
                        req.insert("a1_".into(), a1);
                    }
                })
                .map_response(|model, res| {
                    if let Some(a1) = res.get("a1_") {
                        model.set("a1", a1.clone());
                    }
                }),
        )
        .expect("A resolves")
});

pub static B: LazyLock<Arc<Schema>> = LazyLock::new(|| {
    A.extend(
        ModelDef::new("B")
            .default_values(b_defaults())
            .map_request(|model, req| {
                req.shift_remove("b1");
                if let Some(b1) = model.get("b1") {
                    req.insert("b1_".into(), b1);
                }
            })
            .map_response(|model, res| {
                if let Some(b1) = res.get("b1_") {
                    model.set("b1", b1.clone());
                }
            }),
    )
    .expect("B resolves")
});

pub fn a_defaults() -> Props {
    props(json!({"a1": 0, "a2": "2", "a3": null}))
}

pub fn b_defaults() -> Props {
    props(json!({"b1": 0, "b2": "2", "b3": null}))
}

/// Unwraps a `json!` object literal.
pub fn props(value: Value) -> Props {
    match value {
        Value::Object(props) => props,
        other => panic!("expected an object, got {other}"),
    }
}

/// `base` with the entries of `overrides` applied on top.
pub fn merged(base: &Props, overrides: Value) -> Props {
    let mut merged = base.clone();
    merged.extend(props(overrides));
    merged
}

pub fn ab_defaults() -> Props {
    let mut all = a_defaults();
    all.extend(b_defaults());
    all
}

pub fn keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default()
}

/// A getter/setter backend over a shared map that merges on write, like a
/// caller assigning into its own object.
pub fn shared_props_backend() -> (Rc<RefCell<Props>>, Backend) {
    let shared = Rc::new(RefCell::new(Props::new()));
    let reader = Rc::clone(&shared);
    let writer = Rc::clone(&shared);
    let backend = Backend::callbacks(
        move || Value::Object(reader.borrow().clone()),
        move |modified, _boxed, callback| {
            writer.borrow_mut().extend(modified);
            if let Some(callback) = callback {
                callback();
            }
        },
    );
    (shared, backend)
}
