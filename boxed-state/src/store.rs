//! Props storage backends.
//!
//! A [`PropsStore`] owns (or reaches) the committed snapshot of a model's
//! properties. The property box only reads it and hands it new snapshots; how
//! a snapshot is adopted is up to the backend.

use std::fmt;

use serde_json::{Map, Value};

/// A flat mapping of property name to value.
pub type Props = Map<String, Value>;

/// Completion notification passed through a commit.
pub type SaveCallback = Box<dyn FnOnce()>;

/// Reads the committed snapshot of a callback-backed store.
pub type PropsGetter = Box<dyn Fn() -> Value>;

/// Adopts a new snapshot: `(modified, boxed, callback)`.
///
/// `boxed` is true when the write commits a staged delta and false for a
/// direct bulk replace. The setter is responsible for invoking `callback`.
pub type PropsSetter = Box<dyn FnMut(Props, bool, Option<SaveCallback>)>;

/// Read/write contract between a property box and its storage.
pub trait PropsStore {
    /// Returns the committed snapshot. Anything other than an object means
    /// the store holds no props yet.
    fn read(&self) -> Value;

    /// Hands the store a new snapshot to adopt.
    fn write(&mut self, modified: Props, boxed: bool, callback: Option<SaveCallback>);

    /// Returns one committed value, `None` when absent.
    fn value(&self, name: &str) -> Option<Value> {
        match self.read() {
            Value::Object(props) => props.get(name).cloned(),
            _ => None,
        }
    }
}

/// Props held directly by the owning model.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    props: Props,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with an initial snapshot.
    pub fn with_props(props: Props) -> Self {
        Self { props }
    }

    /// Returns the committed snapshot without copying it.
    pub fn props(&self) -> &Props {
        &self.props
    }
}

impl PropsStore for MemoryStore {
    fn read(&self) -> Value {
        Value::Object(self.props.clone())
    }

    fn write(&mut self, modified: Props, _boxed: bool, callback: Option<SaveCallback>) {
        self.props = modified;
        if let Some(callback) = callback {
            callback();
        }
    }

    fn value(&self, name: &str) -> Option<Value> {
        self.props.get(name).cloned()
    }
}

/// Props reached through a caller-supplied getter/setter pair.
pub struct CallbackStore {
    get_props: PropsGetter,
    set_props: PropsSetter,
}

impl CallbackStore {
    /// Creates a store from a getter and a setter.
    pub fn new(get_props: PropsGetter, set_props: PropsSetter) -> Self {
        Self {
            get_props,
            set_props,
        }
    }
}

impl fmt::Debug for CallbackStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackStore").finish_non_exhaustive()
    }
}

impl PropsStore for CallbackStore {
    fn read(&self) -> Value {
        (self.get_props)()
    }

    fn write(&mut self, modified: Props, boxed: bool, callback: Option<SaveCallback>) {
        (self.set_props)(modified, boxed, callback);
    }
}
