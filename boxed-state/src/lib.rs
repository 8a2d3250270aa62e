//! Transactional property box for boxed models.
//!
//! A [`PropertyBox`] sits between a model and wherever its props actually
//! live:
//! - [`MemoryStore`]: props owned by the model
//! - [`CallbackStore`]: a caller-supplied getter/setter pair
//! - [`ContainerStore`]: a named slot of a shared [`StateHolder`]
//!
//! Property writes are staged in the box and reach the store only on
//! [`PropertyBox::save`]; [`PropertyBox::cancel`] discards them. Everything is
//! synchronous and single-threaded.

mod container;
mod error;
mod options;
mod property_box;
mod store;

pub use container::{ContainerStore, StateContainer, StateHolder};
pub use error::{StateError, StateResult};
pub use options::{Backend, StoreOptions};
pub use property_box::{DirtyQuery, PropertyBox};
pub use store::{
    CallbackStore, MemoryStore, Props, PropsGetter, PropsSetter, PropsStore, SaveCallback,
};
