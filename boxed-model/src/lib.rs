//! Transactional data models with inherited property schemas.
//!
//! - [`Schema`]: the flattened, immutable property schema of a model level,
//!   resolved once from a [`ModelDef`] on top of its parent schema
//! - [`Model`]: an instance of a schema; property writes are staged and only
//!   reach the props backend on [`Model::save`]
//! - [`copy_from_to`]: the copy routine behind [`Model::to_request`] and
//!   [`Model::load_response`]
//!
//! # Example
//!
//! ```
//! use boxed_model::{Model, ModelDef, Schema};
//! use serde_json::{json, Value};
//!
//! let book = Schema::base()
//!     .extend(
//!         ModelDef::new("Book")
//!             .default_value("bookId", 0)
//!             .default_value("title", "")
//!             .map_request(|model, req| {
//!                 req.shift_remove("bookId");
//!                 req.insert("id".into(), model.get("bookId").unwrap_or(Value::Null));
//!             })
//!             .map_response(|model, res| {
//!                 if let Some(id) = res.get("id") {
//!                     model.set("bookId", id.clone());
//!                 }
//!             }),
//!     )
//!     .unwrap();
//!
//! let mut model = Model::new(&book);
//! model.set("title", "New Book");
//! assert_eq!(model.props(), json!({"bookId": 0, "title": ""}));
//!
//! model.save();
//! assert_eq!(model.to_request(), *json!({"id": 0, "title": "New Book"}).as_object().unwrap());
//! ```

mod copy;
mod declaration;
mod error;
mod model;
mod schema;

pub use boxed_state::{
    Backend, DirtyQuery, Props, SaveCallback, StateContainer, StateError, StateHolder,
    StoreOptions,
};
pub use copy::{copy_from_to, copy_values, PropertySource, PropertyTarget};
pub use declaration::ModelDeclaration;
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use schema::{
    Accessor, ModelDef, PropertySummary, RequestHook, ResponseHook, Schema, SchemaSummary,
    BASE_MODEL_NAME, RESERVED_PROPS,
};
