//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Invalid role table: {0}")]
    RoleError(#[from] palisade_rbac::RegistryError),

    #[error("XDG directory error: {0}")]
    XdgError(String),
}
