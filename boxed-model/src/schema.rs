//! Model schemas.
//!
//! A [`Schema`] is the flattened view of one model level and all of its
//! ancestors: merged default values, the ordered copy-list, the accessor for
//! every property name, and the request/response hooks in base-first order.
//! It is resolved once per model level, from a [`ModelDef`], and never
//! changes afterwards.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::Props;

/// Name of the root model level.
pub const BASE_MODEL_NAME: &str = "Model";

/// Names owned by the model API itself. No model level may declare them.
pub const RESERVED_PROPS: &[&str] = &[
    "exists",
    "dirty",
    "props",
    "props_box",
    "save",
    "cancel",
    "isDirty",
    "toRequest",
    "loadResponse",
    "is_dirty",
    "to_request",
    "load_response",
];

/// Adjusts an outgoing request after the copy-list has been copied into it.
pub type RequestHook = Arc<dyn Fn(&Model, &mut Props) + Send + Sync>;

/// Pulls fields the copy-list does not cover out of an incoming response.
pub type ResponseHook = Arc<dyn Fn(&mut Model, &Props) + Send + Sync>;

/// How a property name is read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessor {
    /// Plain staged property.
    Value,
    /// Staged property coerced to a boolean on read and write (`exists`).
    Flag,
    /// Read-only view of the staged delta (`dirty`).
    Delta,
}

impl Accessor {
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::Delta)
    }
}

/// Declarations contributed by one model level.
///
/// Copied props default to the keys of the default values when not given.
pub struct ModelDef {
    name: String,
    default_values: Props,
    copied_props: Option<Vec<String>>,
    model_props: Vec<String>,
    map_request: Option<RequestHook>,
    map_response: Option<ResponseHook>,
}

impl ModelDef {
    /// Starts an empty definition for the level called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_values: Props::new(),
            copied_props: None,
            model_props: Vec::new(),
            map_request: None,
            map_response: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares one property with a default value.
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_values.insert(name.into(), value.into());
        self
    }

    /// Declares every key of `values` as a property with that default.
    pub fn default_values(mut self, values: Props) -> Self {
        self.default_values.extend(values);
        self
    }

    /// Sets the names this level adds to the copy-list.
    pub fn copied_props<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.copied_props = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Declares properties that have no default and are not copied.
    pub fn model_props<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model_props.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets this level's request hook.
    pub fn map_request(
        mut self,
        hook: impl Fn(&Model, &mut Props) + Send + Sync + 'static,
    ) -> Self {
        self.map_request = Some(Arc::new(hook));
        self
    }

    /// Sets this level's response hook.
    pub fn map_response(
        mut self,
        hook: impl Fn(&mut Model, &Props) + Send + Sync + 'static,
    ) -> Self {
        self.map_response = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ModelDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDef")
            .field("name", &self.name)
            .field("default_values", &self.default_values)
            .field("copied_props", &self.copied_props)
            .field("model_props", &self.model_props)
            .field("map_request", &self.map_request.is_some())
            .field("map_response", &self.map_response.is_some())
            .finish()
    }
}

static BASE: LazyLock<Arc<Schema>> = LazyLock::new(|| Arc::new(Schema::root()));

/// Resolved, immutable property schema of one model level.
pub struct Schema {
    name: String,
    parent: Option<Arc<Schema>>,
    /// Names declared by this level alone.
    declared: Vec<String>,
    default_values: Props,
    copied_props: Vec<String>,
    property_names: Vec<String>,
    accessors: HashMap<String, Accessor>,
    request_hooks: Vec<RequestHook>,
    response_hooks: Vec<ResponseHook>,
}

impl Schema {
    /// Returns the root schema every model extends.
    ///
    /// It declares only the framework accessors `exists` and `dirty`.
    pub fn base() -> Arc<Schema> {
        Arc::clone(&BASE)
    }

    fn root() -> Self {
        let framework = [("exists", Accessor::Flag), ("dirty", Accessor::Delta)];
        Self {
            name: BASE_MODEL_NAME.to_string(),
            parent: None,
            declared: framework.iter().map(|(name, _)| name.to_string()).collect(),
            default_values: Props::new(),
            copied_props: Vec::new(),
            property_names: framework.iter().map(|(name, _)| name.to_string()).collect(),
            accessors: framework
                .into_iter()
                .map(|(name, accessor)| (name.to_string(), accessor))
                .collect(),
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    /// Resolves `def` as a subclass of this schema.
    ///
    /// Fails if any name in the definition's default values, copied props or
    /// model props is already declared by an ancestor or reserved by the
    /// framework.
    pub fn extend(self: &Arc<Self>, def: ModelDef) -> ModelResult<Arc<Schema>> {
        let reserved = self.reserved_names();

        let ModelDef {
            name,
            default_values,
            copied_props,
            model_props,
            map_request,
            map_response,
        } = def;
        let copied_props =
            copied_props.unwrap_or_else(|| default_values.keys().cloned().collect());

        let mut declared = Vec::new();
        let mut seen = HashSet::new();
        for prop in default_values
            .keys()
            .chain(copied_props.iter())
            .chain(model_props.iter())
        {
            if let Some(reason) = reserved.get(prop.as_str()) {
                return Err(ModelError::ReservedProperty {
                    name: prop.clone(),
                    reason: reason.clone(),
                });
            }
            if seen.insert(prop.as_str()) {
                declared.push(prop.clone());
            }
        }

        let mut property_names = self.property_names.clone();
        let mut accessors = self.accessors.clone();
        for prop in &declared {
            property_names.push(prop.clone());
            accessors.insert(prop.clone(), Accessor::Value);
        }

        let mut merged_defaults = self.default_values.clone();
        merged_defaults.extend(default_values);

        let mut merged_copied = self.copied_props.clone();
        for prop in copied_props {
            if !merged_copied.contains(&prop) {
                merged_copied.push(prop);
            }
        }

        let mut request_hooks = self.request_hooks.clone();
        request_hooks.extend(map_request);
        let mut response_hooks = self.response_hooks.clone();
        response_hooks.extend(map_response);

        debug!(
            "Resolved model schema {} ({} properties, {} copied)",
            name,
            property_names.len(),
            merged_copied.len()
        );

        Ok(Arc::new(Schema {
            name,
            parent: Some(Arc::clone(self)),
            declared,
            default_values: merged_defaults,
            copied_props: merged_copied,
            property_names,
            accessors,
            request_hooks,
            response_hooks,
        }))
    }

    /// Maps every name a subclass may not declare to the reason why.
    fn reserved_names(&self) -> HashMap<&str, String> {
        let mut reserved = HashMap::new();
        for ancestor in self.lineage() {
            for prop in &ancestor.declared {
                reserved.insert(prop.as_str(), format!("defined in {}", ancestor.name));
            }
        }
        for prop in RESERVED_PROPS {
            reserved.insert(*prop, "reserved framework property".to_string());
        }
        reserved
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<Schema>> {
        self.parent.as_ref()
    }

    /// Returns this level and its ancestors, root first.
    pub fn lineage(&self) -> Vec<&Schema> {
        let mut chain = vec![self];
        let mut current = self;
        while let Some(parent) = &current.parent {
            chain.push(parent.as_ref());
            current = parent.as_ref();
        }
        chain.reverse();
        chain
    }

    /// Returns true if `ancestor` is this schema or one of its ancestors.
    pub fn extends(&self, ancestor: &Schema) -> bool {
        self.lineage().into_iter().any(|s| std::ptr::eq(s, ancestor))
    }

    /// Names declared by this level alone, in declaration order.
    pub fn declared_props(&self) -> &[String] {
        &self.declared
    }

    /// Merged default values, ancestors first.
    pub fn default_values(&self) -> &Props {
        &self.default_values
    }

    /// Names copied to requests and from responses, ancestors first.
    pub fn copied_props(&self) -> &[String] {
        &self.copied_props
    }

    /// Every property with an accessor, ancestors first.
    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        self.accessors.get(name).copied()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.accessors.contains_key(name)
    }

    pub(crate) fn request_hooks(&self) -> &[RequestHook] {
        &self.request_hooks
    }

    pub(crate) fn response_hooks(&self) -> &[ResponseHook] {
        &self.response_hooks
    }

    /// Returns a serializable description of the schema.
    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            name: self.name.clone(),
            lineage: self.lineage().iter().map(|s| s.name.clone()).collect(),
            default_values: self.default_values.clone(),
            copied_props: self.copied_props.clone(),
            properties: self
                .property_names
                .iter()
                .filter_map(|name| {
                    self.accessor(name).map(|accessor| PropertySummary {
                        name: name.clone(),
                        accessor,
                    })
                })
                .collect(),
            request_hooks: self.request_hooks.len(),
            response_hooks: self.response_hooks.len(),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| p.name.as_str()))
            .field("default_values", &self.default_values)
            .field("copied_props", &self.copied_props)
            .field("property_names", &self.property_names)
            .field("request_hooks", &self.request_hooks.len())
            .field("response_hooks", &self.response_hooks.len())
            .finish()
    }
}

/// Diagnostic snapshot of a [`Schema`].
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSummary {
    pub name: String,
    /// Level names, root first.
    pub lineage: Vec<String>,
    pub default_values: Props,
    pub copied_props: Vec<String>,
    pub properties: Vec<PropertySummary>,
    pub request_hooks: usize,
    pub response_hooks: usize,
}

/// One property of a [`SchemaSummary`].
#[derive(Debug, Clone, Serialize)]
pub struct PropertySummary {
    pub name: String,
    pub accessor: Accessor,
}
