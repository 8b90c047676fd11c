//! Field resolution errors.

use palisade_schema::ResolveError;
use thiserror::Error;

/// Failure of a single field resolution.
///
/// Every variant is scoped to one field: sibling fields of the same request
/// resolve independently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field declares no permissions, its type declares none, and
    /// neither name is reserved. Raised on every invocation.
    #[error("No access control specified for {type_name}.{field_name}. Deny by default")]
    Configuration {
        type_name: String,
        field_name: String,
    },

    /// The principal holds none of the required permissions.
    #[error("Unauthorized: {type_name}.{field_name}")]
    AccessDenied {
        type_name: String,
        field_name: String,
    },

    /// The field's own logic failed.
    #[error(transparent)]
    Resolver(#[from] ResolveError),

    #[error("Unknown field: {type_name}.{field_name}")]
    UnknownField {
        type_name: String,
        field_name: String,
    },
}

impl FieldError {
    /// Error code a transport reports for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::Configuration { .. } | FieldError::AccessDenied { .. } => "FORBIDDEN",
            FieldError::Resolver(err) => err.code(),
            FieldError::UnknownField { .. } => "GRAPHQL_VALIDATION_FAILED",
        }
    }

    /// True for authorization failures (configuration or access denied).
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            FieldError::Configuration { .. } | FieldError::AccessDenied { .. }
        )
    }
}

/// Result type for field resolution.
pub type Result<T> = std::result::Result<T, FieldError>;
