//! Error types for model definition, construction and copying.

use boxed_state::StateError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Misuse of the model API.
///
/// Every variant is an illegal-argument failure raised where the mistake is
/// made: at definition, construction or copy time. Property reads and writes
/// never fail.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A model level declares a name that an ancestor or the framework owns.
    #[error("IllegalArgument, '{name}' {reason} cannot be redefined")]
    ReservedProperty { name: String, reason: String },

    /// A declaration argument has the wrong shape.
    #[error("IllegalArgument, {0}")]
    InvalidDeclaration(String),

    /// A copy source or destination is not an object.
    #[error("IllegalArgument, {role} is not object, got {got}")]
    NotAnObject { role: &'static str, got: String },

    /// A copy property list is not an array.
    #[error("IllegalArgument, property keys for copy should be an array, got {0}")]
    NotASequence(String),

    /// Backend options match no accepted shape.
    #[error(transparent)]
    State(#[from] StateError),
}

impl ModelError {
    /// Returns true for illegal-argument failures, which is all of them.
    pub fn is_illegal_argument(&self) -> bool {
        match self {
            Self::ReservedProperty { .. }
            | Self::InvalidDeclaration(_)
            | Self::NotAnObject { .. }
            | Self::NotASequence(_) => true,
            Self::State(StateError::InvalidOptions(_)) => true,
        }
    }
}
