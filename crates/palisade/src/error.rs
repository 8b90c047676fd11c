//! Error types for the Palisade SDK.

use thiserror::Error;

/// Errors raised while assembling an authorization engine.
#[derive(Debug, Error)]
pub enum PalisadeError {
    #[error(transparent)]
    Config(#[from] palisade_config::ConfigError),

    #[error(transparent)]
    Registry(#[from] palisade_rbac::RegistryError),

    #[error(transparent)]
    Schema(#[from] palisade_schema::SchemaError),

    #[error(transparent)]
    Definition(#[from] palisade_schema::DefinitionError),
}

/// Result type for Palisade operations.
pub type Result<T> = std::result::Result<T, PalisadeError>;
