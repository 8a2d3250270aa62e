//! Model instances.

use std::fmt;
use std::sync::Arc;

use boxed_state::{Backend, DirtyQuery, PropertyBox, StoreOptions};
use serde_json::Value;
use tracing::{debug, warn};

use crate::copy::copy_from_to;
use crate::error::{ModelError, ModelResult};
use crate::schema::{Accessor, Schema};
use crate::Props;

/// One instance of a model schema bound to a props backend.
///
/// Property writes go through a [`PropertyBox`]: they are visible to reads
/// on this model right away but reach the backend only on [`save`](Self::save).
pub struct Model {
    schema: Arc<Schema>,
    props_box: PropertyBox,
}

impl Model {
    /// Creates a model whose props live in the model itself.
    pub fn new(schema: &Arc<Schema>) -> Self {
        Self::with_backend(schema, Backend::Memory)
    }

    /// Creates a model over `backend`.
    ///
    /// Missing defaults are written to the backend directly, so a new model
    /// has nothing staged.
    pub fn with_backend(schema: &Arc<Schema>, backend: Backend) -> Self {
        let mut props_box = PropertyBox::from_backend(backend);
        if !props_box.snapshot().is_object() {
            props_box.replace(Props::new());
        }

        let mut props = match props_box.snapshot() {
            Value::Object(props) => props,
            _ => Props::new(),
        };
        merge_defaults(&mut props, schema.default_values());
        props_box.replace(props);

        debug!("Created {} model", schema.name());
        Self {
            schema: Arc::clone(schema),
            props_box,
        }
    }

    /// Creates a model over the backend described by `options`.
    pub fn with_options(schema: &Arc<Schema>, options: StoreOptions) -> ModelResult<Self> {
        Ok(Self::with_backend(schema, options.resolve()?))
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the committed props as the backend currently holds them.
    pub fn props(&self) -> Value {
        self.props_box.snapshot()
    }

    /// Replaces the committed props, bypassing staging.
    ///
    /// Anything staged is discarded first.
    pub fn set_props(&mut self, props: Props) {
        self.props_box.replace(props);
    }

    /// Reads a property, seeing staged writes.
    ///
    /// Returns `None` for names the schema does not declare.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.schema.accessor(name)? {
            Accessor::Value => self.props_box.get(name),
            Accessor::Flag => Some(Value::Bool(
                self.props_box.get(name).is_some_and(|v| is_truthy(&v)),
            )),
            Accessor::Delta => self.props_box.delta().cloned().map(Value::Object),
        }
    }

    /// Stages a property write.
    ///
    /// Writes to undeclared or read-only names are ignored and return false.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        match self.schema.accessor(name) {
            Some(Accessor::Value) => {
                self.props_box.set(name, value.into());
                true
            }
            Some(Accessor::Flag) => {
                let flag = is_truthy(&value.into());
                self.props_box.set(name, Value::Bool(flag));
                true
            }
            Some(Accessor::Delta) => {
                warn!("Ignoring write to read-only property {} of {}", name, self.schema.name());
                false
            }
            None => {
                warn!("Ignoring write to undeclared property {} of {}", name, self.schema.name());
                false
            }
        }
    }

    /// Whether the model is known to exist on the other side of the wire.
    pub fn exists(&self) -> bool {
        self.props_box.get("exists").is_some_and(|v| is_truthy(&v))
    }

    pub fn set_exists(&mut self, exists: bool) {
        self.props_box.set("exists", Value::Bool(exists));
    }

    /// Returns the staged delta, `None` when nothing is staged.
    pub fn dirty(&self) -> Option<&Props> {
        self.props_box.delta()
    }

    /// Commits staged writes to the backend.
    pub fn save(&mut self) {
        self.props_box.save(None);
    }

    /// Commits staged writes and calls `callback` once the backend has
    /// accepted them. The callback also runs when nothing is staged.
    pub fn save_with(&mut self, callback: impl FnOnce() + 'static) {
        self.props_box.save(Some(Box::new(callback)));
    }

    /// Discards staged writes.
    pub fn cancel(&mut self) -> &mut Self {
        self.props_box.cancel();
        self
    }

    /// Returns true if any queried property has a staged value different
    /// from its committed one.
    ///
    /// Arrays and objects written since the last commit always count as
    /// different, even when equal in content.
    pub fn is_dirty<'a>(&self, query: impl Into<DirtyQuery<'a>>) -> bool {
        self.props_box.is_dirty(query)
    }

    /// Builds the wire shape of this model.
    ///
    /// Copied props are read through the accessors, then each level's
    /// request hook runs, base level first.
    pub fn to_request(&self) -> Props {
        let mut request = Props::new();
        copy_from_to(self, &mut request, self.schema.copied_props(), None);
        for hook in self.schema.request_hooks() {
            hook(self, &mut request);
        }

        debug!("Built {} request with {} fields", self.schema.name(), request.len());
        request
    }

    /// Stages the contents of a wire response.
    ///
    /// Anything staged before is discarded. Copied props absent from the
    /// response are reset to their defaults when `clear_to_defaults` is set.
    /// Each level's response hook runs base level first, then `exists` is
    /// set. Nothing is committed until [`save`](Self::save).
    pub fn load_response(
        &mut self,
        response: &Value,
        clear_to_defaults: bool,
    ) -> ModelResult<&mut Self> {
        let Value::Object(response) = response else {
            return Err(ModelError::NotAnObject {
                role: "source",
                got: response.to_string(),
            });
        };

        self.cancel();
        let schema = Arc::clone(&self.schema);
        let defaults = clear_to_defaults.then(|| schema.default_values());
        copy_from_to(response, self, schema.copied_props(), defaults);
        for hook in schema.response_hooks() {
            hook(self, response);
        }
        self.set_exists(true);

        debug!("Loaded {} response with {} fields", schema.name(), response.len());
        Ok(self)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("schema", &self.schema.name())
            .field("props_box", &self.props_box)
            .finish()
    }
}

/// Fills keys missing from `props` with their defaults.
fn merge_defaults(props: &mut Props, defaults: &Props) {
    for (name, default) in defaults {
        if !props.contains_key(name) {
            props.insert(name.clone(), default.clone());
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
