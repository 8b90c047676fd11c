//! Schema construction errors.

use palisade_types::PermissionFormatError;
use thiserror::Error;

/// Errors raised while building the descriptor graph, the permission index
/// or the guarded schema.
///
/// All of them are startup-fatal: they describe a schema that must be fixed,
/// never a condition a caller can retry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An `auth` annotation lists a malformed permission token.
    #[error("malformed auth annotation on {owner}: {source}")]
    MalformedAnnotation {
        /// `Type` or `Type.field` carrying the annotation.
        owner: String,
        source: PermissionFormatError,
    },

    /// Two object types share a name.
    #[error("type '{0}' is declared more than once")]
    DuplicateType(String),

    /// A type declares the same field twice.
    #[error("field '{type_name}.{field_name}' is declared more than once")]
    DuplicateField {
        type_name: String,
        field_name: String,
    },

    /// A type or field has an empty name.
    #[error("empty name in {0}")]
    EmptyName(String),
}

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;
