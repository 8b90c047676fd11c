//! Configuration management for Palisade
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (PALISADE_<SECTION>__<KEY>, highest precedence)
//! 2. palisade.local.toml (gitignored, local overrides)
//! 3. palisade.toml (git-tracked, project config)
//! 4. ~/.config/palisade/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)

use anyhow::Result;
use palisade_rbac::RoleRegistry;
use palisade_types::RESERVED_PREFIX;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main Palisade configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PalisadeConfig {
    pub project: ProjectConfig,
    pub enforcement: EnforcementConfig,
    pub logging: LoggingConfig,
    pub roles: BTreeMap<String, RoleConfig>,
}

impl Default for PalisadeConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            enforcement: EnforcementConfig::default(),
            logging: LoggingConfig::default(),
            roles: standard_roles(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "palisade-project".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnforcementConfig {
    /// Field and type names starting with this prefix bypass all checks.
    pub reserved_prefix: String,
    /// Log every grant and deny while serving.
    pub audit: bool,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            reserved_prefix: RESERVED_PREFIX.to_string(),
            audit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Role definition from config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    #[serde(default)]
    pub permissions: Vec<String>,
}

fn standard_roles() -> BTreeMap<String, RoleConfig> {
    RoleRegistry::standard()
        .iter()
        .map(|role| {
            (
                role.id.to_string(),
                RoleConfig {
                    permissions: role.permissions.iter().map(ToString::to_string).collect(),
                },
            )
        })
        .collect()
}

impl PalisadeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Check invariants the loader cannot express through types
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enforcement.reserved_prefix.is_empty() {
            return Err(ConfigError::ValidationError(
                "enforcement.reserved_prefix must not be empty".to_string(),
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the role registry described by `[roles]`
    pub fn role_registry(&self) -> Result<RoleRegistry, ConfigError> {
        let registry = RoleRegistry::new(
            self.roles
                .iter()
                .map(|(id, role)| (id.as_str(), role.permissions.iter())),
        )?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_types::{Permission, RoleId};

    #[test]
    fn test_default_config() {
        let config = PalisadeConfig::default();
        assert_eq!(config.project.name, "palisade-project");
        assert_eq!(config.enforcement.reserved_prefix, "_");
        assert!(config.enforcement.audit);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_roles_match_standard_table() {
        let config = PalisadeConfig::default();
        assert_eq!(config.roles["anonymous"].permissions, Vec::<String>::new());
        assert_eq!(
            config.roles["employee"].permissions,
            ["customer:read", "customer:write", "notes:read"]
        );

        let registry = config.role_registry().unwrap();
        assert_eq!(registry.len(), RoleRegistry::standard().len());
        assert!(
            registry
                .lookup(&RoleId::from("invoice-manager"))
                .permissions
                .contains(&Permission::from("invoice:write"))
        );
    }

    #[test]
    fn test_invalid_role_permission() {
        let mut config = PalisadeConfig::default();
        config.roles.insert(
            "broken".to_string(),
            RoleConfig {
                permissions: vec!["customer read".to_string()],
            },
        );

        assert!(matches!(config.role_registry(), Err(ConfigError::RoleError(_))));
    }

    #[test]
    fn test_toml_round_trip_keeps_roles() {
        let config = PalisadeConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();

        assert!(rendered.contains("[roles.employee]"));
        let parsed: PalisadeConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.roles, config.roles);
    }
}
