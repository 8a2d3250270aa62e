//! Backend configuration.
//!
//! [`Backend`] is the tagged form a property box is built from. [`StoreOptions`]
//! is the loose, builder-style form: any combination of fields can be set and
//! [`StoreOptions::resolve`] decides which backend (if any) the shape describes.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::container::{ContainerStore, StateHolder};
use crate::error::{StateError, StateResult};
use crate::store::{
    CallbackStore, MemoryStore, Props, PropsGetter, PropsSetter, PropsStore, SaveCallback,
};

/// Where a model's committed props live.
#[derive(Default)]
pub enum Backend {
    /// Props owned by the model itself.
    #[default]
    Memory,
    /// Props reached through a getter/setter pair.
    Callbacks {
        get_props: PropsGetter,
        set_props: PropsSetter,
    },
    /// Props kept in `state_holder`'s slot `state_name`.
    Container {
        state_holder: Rc<dyn StateHolder>,
        state_name: String,
    },
}

impl Backend {
    /// Shorthand for [`Backend::Callbacks`].
    pub fn callbacks(
        get_props: impl Fn() -> Value + 'static,
        set_props: impl FnMut(Props, bool, Option<SaveCallback>) + 'static,
    ) -> Self {
        Self::Callbacks {
            get_props: Box::new(get_props),
            set_props: Box::new(set_props),
        }
    }

    /// Shorthand for [`Backend::Container`].
    pub fn container(state_holder: Rc<dyn StateHolder>, state_name: impl Into<String>) -> Self {
        Self::Container {
            state_holder,
            state_name: state_name.into(),
        }
    }

    /// Builds the store this backend describes.
    pub fn into_store(self) -> Box<dyn PropsStore> {
        match self {
            Self::Memory => Box::new(MemoryStore::new()),
            Self::Callbacks {
                get_props,
                set_props,
            } => Box::new(CallbackStore::new(get_props, set_props)),
            Self::Container {
                state_holder,
                state_name,
            } => Box::new(ContainerStore::new(state_holder, state_name)),
        }
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Callbacks { .. } => f.debug_struct("Callbacks").finish_non_exhaustive(),
            Self::Container { state_name, .. } => f
                .debug_struct("Container")
                .field("state_name", state_name)
                .finish_non_exhaustive(),
        }
    }
}

/// Loose backend options, validated by [`resolve`](Self::resolve).
#[derive(Default)]
pub struct StoreOptions {
    get_props: Option<PropsGetter>,
    set_props: Option<PropsSetter>,
    state_holder: Option<Rc<dyn StateHolder>>,
    state_name: Option<String>,
}

impl StoreOptions {
    /// Creates empty options, which resolve to [`Backend::Memory`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_props(mut self, get_props: impl Fn() -> Value + 'static) -> Self {
        self.get_props = Some(Box::new(get_props));
        self
    }

    pub fn set_props(
        mut self,
        set_props: impl FnMut(Props, bool, Option<SaveCallback>) + 'static,
    ) -> Self {
        self.set_props = Some(Box::new(set_props));
        self
    }

    pub fn state_holder(mut self, state_holder: Rc<dyn StateHolder>) -> Self {
        self.state_holder = Some(state_holder);
        self
    }

    pub fn state_name(mut self, state_name: impl Into<String>) -> Self {
        self.state_name = Some(state_name.into());
        self
    }

    /// Returns true when no option has been set.
    pub fn is_empty(&self) -> bool {
        self.get_props.is_none()
            && self.set_props.is_none()
            && self.state_holder.is_none()
            && self.state_name.is_none()
    }

    /// Picks the backend described by the options.
    ///
    /// A complete getter/setter pair wins over a container pair; an empty set
    /// of options selects the in-memory store. Any other shape is rejected.
    pub fn resolve(self) -> StateResult<Backend> {
        if self.is_empty() {
            return Ok(Backend::Memory);
        }

        let shape = self.describe();
        match self {
            Self {
                get_props: Some(get_props),
                set_props: Some(set_props),
                ..
            } => Ok(Backend::Callbacks {
                get_props,
                set_props,
            }),
            Self {
                state_holder: Some(state_holder),
                state_name: Some(state_name),
                ..
            } => Ok(Backend::Container {
                state_holder,
                state_name,
            }),
            _ => Err(StateError::InvalidOptions(shape)),
        }
    }

    fn describe(&self) -> String {
        let mut fields = Vec::new();
        if self.get_props.is_some() {
            fields.push("get_props".to_string());
        }
        if self.set_props.is_some() {
            fields.push("set_props".to_string());
        }
        if self.state_holder.is_some() {
            fields.push("state_holder".to_string());
        }
        if let Some(state_name) = &self.state_name {
            fields.push(format!("state_name: {state_name:?}"));
        }
        format!("{{ {} }}", fields.join(", "))
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl TryFrom<StoreOptions> for Backend {
    type Error = StateError;

    fn try_from(options: StoreOptions) -> StateResult<Self> {
        options.resolve()
    }
}
