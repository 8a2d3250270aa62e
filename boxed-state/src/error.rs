//! Error types for props storage configuration.

use thiserror::Error;

/// Result type for props storage operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors raised while configuring props storage.
#[derive(Debug, Error)]
pub enum StateError {
    /// The options match neither the callback form nor the container form.
    #[error(
        "IllegalArgument, options must be {{ get_props, set_props }} or {{ state_name, state_holder }}, got {0}"
    )]
    InvalidOptions(String),
}
