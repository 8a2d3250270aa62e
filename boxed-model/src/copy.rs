//! Copying props between models and plain objects.

use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::Props;

/// Something props can be read from by name.
pub trait PropertySource {
    fn property(&self, name: &str) -> Option<Value>;
}

/// Something props can be written to and removed from by name.
pub trait PropertyTarget {
    fn put_property(&mut self, name: &str, value: Value);

    fn remove_property(&mut self, name: &str);
}

impl PropertySource for Props {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl PropertyTarget for Props {
    fn put_property(&mut self, name: &str, value: Value) {
        self.insert(name.to_string(), value);
    }

    fn remove_property(&mut self, name: &str) {
        self.shift_remove(name);
    }
}

impl PropertySource for Model {
    fn property(&self, name: &str) -> Option<Value> {
        self.get(name)
    }
}

impl PropertyTarget for Model {
    fn put_property(&mut self, name: &str, value: Value) {
        self.set(name, value);
    }

    /// Model properties cannot be removed; only default-filling resets them.
    fn remove_property(&mut self, _name: &str) {}
}

/// Copies the listed props from `src` to `dst`.
///
/// A name present in `src` is copied; an absent one is removed from `dst`.
/// With `defaults`, every default whose name was not copied is then written
/// to `dst` as a fresh copy of the default value.
pub fn copy_from_to<S, D>(src: &S, dst: &mut D, names: &[String], defaults: Option<&Props>)
where
    S: PropertySource + ?Sized,
    D: PropertyTarget + ?Sized,
{
    let mut remaining = defaults.cloned();
    for name in names {
        match src.property(name) {
            Some(value) => {
                dst.put_property(name, value);
                if let Some(remaining) = remaining.as_mut() {
                    remaining.shift_remove(name.as_str());
                }
            }
            None => dst.remove_property(name),
        }
    }

    if let Some(remaining) = remaining {
        for (name, default) in remaining {
            dst.put_property(&name, default);
        }
    }
}

/// [`copy_from_to`] over untyped JSON values.
///
/// Fails if `src` or `dst` is not an object, or if `names` is given but is
/// not an array.
pub fn copy_values(
    src: &Value,
    dst: &mut Value,
    names: Option<&Value>,
    defaults: Option<&Props>,
) -> ModelResult<()> {
    let src = match src {
        Value::Object(props) => props,
        other => {
            return Err(ModelError::NotAnObject {
                role: "source",
                got: other.to_string(),
            });
        }
    };
    let dst = match dst {
        Value::Object(props) => props,
        other => {
            return Err(ModelError::NotAnObject {
                role: "destination",
                got: other.to_string(),
            });
        }
    };
    let names: Vec<String> = match names {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(other) => return Err(ModelError::NotASequence(other.to_string())),
    };

    copy_from_to(src, dst, &names, defaults);
    Ok(())
}
