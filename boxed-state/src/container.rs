//! Props kept in a named slot of a shared state container.
//!
//! The container may be shared by several models (or mutated by its owner)
//! between operations, so the store never caches the slot: every read goes
//! back to the holder.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::store::{Props, PropsStore, SaveCallback};

/// A component-style state container.
///
/// Methods take `&self` so a callback fired from [`set_state`] may read the
/// container again; implementations must release any internal borrow before
/// invoking it.
///
/// [`set_state`]: StateHolder::set_state
pub trait StateHolder {
    /// Returns the value in slot `state_name`, `Null` when the slot is empty.
    fn state_slot(&self, state_name: &str) -> Value;

    /// Merges `partial` into the state, then invokes `callback` if given.
    fn set_state(&self, partial: Props, callback: Option<SaveCallback>);
}

/// In-process [`StateHolder`] that merges updates synchronously.
#[derive(Debug, Default)]
pub struct StateContainer {
    state: RefCell<Props>,
}

impl StateContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty container ready to be shared between models.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Returns a copy of the whole state.
    pub fn state(&self) -> Props {
        self.state.borrow().clone()
    }
}

impl StateHolder for StateContainer {
    fn state_slot(&self, state_name: &str) -> Value {
        self.state
            .borrow()
            .get(state_name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn set_state(&self, partial: Props, callback: Option<SaveCallback>) {
        self.state.borrow_mut().extend(partial);
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Store backed by one slot of a [`StateHolder`].
pub struct ContainerStore {
    holder: Rc<dyn StateHolder>,
    state_name: String,
}

impl ContainerStore {
    /// Binds a store to `holder.state[state_name]`.
    pub fn new(holder: Rc<dyn StateHolder>, state_name: impl Into<String>) -> Self {
        Self {
            holder,
            state_name: state_name.into(),
        }
    }

    /// Returns the slot name this store writes to.
    pub fn state_name(&self) -> &str {
        &self.state_name
    }
}

impl fmt::Debug for ContainerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerStore")
            .field("state_name", &self.state_name)
            .finish_non_exhaustive()
    }
}

impl PropsStore for ContainerStore {
    fn read(&self) -> Value {
        self.holder.state_slot(&self.state_name)
    }

    fn write(&mut self, modified: Props, _boxed: bool, callback: Option<SaveCallback>) {
        let mut partial = Props::new();
        partial.insert(self.state_name.clone(), Value::Object(modified));
        self.holder.set_state(partial, callback);
    }
}
