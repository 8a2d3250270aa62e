//! JSON model declarations.
//!
//! A model level can be declared as data instead of code:
//!
//! ```json
//! {
//!   "defaultValues": { "bookId": 0, "title": "" },
//!   "copiedProps": ["title"],
//!   "modelProps": { "selected": true }
//! }
//! ```
//!
//! `copiedProps` and `modelProps` take either an array of names or an object
//! whose keys are the names. Hooks are attached to the resulting
//! [`ModelDef`] in code.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::schema::ModelDef;

/// Declarations of one model level as they appear in JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_values: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copied_props: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_props: Option<Value>,
}

impl ModelDeclaration {
    /// Parses a declaration from a JSON value.
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| ModelError::InvalidDeclaration(format!("model declaration: {e}")))
    }

    /// Checks argument shapes and builds the definition for level `name`.
    pub fn into_def(self, name: impl Into<String>) -> ModelResult<ModelDef> {
        let mut def = ModelDef::new(name);

        match self.default_values {
            None => {}
            Some(Value::Object(values)) => def = def.default_values(values),
            Some(other) => {
                return Err(ModelError::InvalidDeclaration(format!(
                    "defaultValues argument must be a plain object, got {other}"
                )));
            }
        }
        if let Some(names) = self.copied_props {
            def = def.copied_props(prop_names("copiedProps", names)?);
        }
        if let Some(names) = self.model_props {
            def = def.model_props(prop_names("modelProps", names)?);
        }

        Ok(def)
    }
}

impl ModelDef {
    /// Builds a definition from a JSON declaration.
    pub fn from_declaration(name: impl Into<String>, declaration: &Value) -> ModelResult<Self> {
        ModelDeclaration::from_value(declaration)?.into_def(name)
    }
}

fn prop_names(argument: &str, value: Value) -> ModelResult<Vec<String>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => Err(ModelError::InvalidDeclaration(format!(
                    "{argument} names must be strings, got {other}"
                ))),
            })
            .collect(),
        Value::Object(keys) => Ok(keys.into_iter().map(|(name, _)| name).collect()),
        other => Err(ModelError::InvalidDeclaration(format!(
            "{argument} argument must be a plain array or object, got {other}"
        ))),
    }
}
