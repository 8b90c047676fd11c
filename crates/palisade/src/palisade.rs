//! Main entry point for the Palisade SDK.
//!
//! A [`Palisade`] owns the role registry and enforcement options of one
//! process and turns descriptor graphs into [`AuthorizedSchema`]s.

use std::path::Path;
use std::sync::Arc;

use palisade_config::PalisadeConfig;
use palisade_guard::{AuthorizedSchema, GuardOptions};
use palisade_rbac::{DecisionEngine, RoleRegistry};
use palisade_schema::{Resolvers, SchemaDefinition, SchemaGraph};
use tracing::info;

use crate::error::Result;

/// Process-wide authorization setup.
#[derive(Debug, Clone)]
pub struct Palisade {
    registry: Arc<RoleRegistry>,
    options: GuardOptions,
}

impl Palisade {
    /// Uses the standard role table and default options.
    pub fn standard() -> Self {
        Self::new(RoleRegistry::standard(), GuardOptions::default())
    }

    pub fn new(registry: RoleRegistry, options: GuardOptions) -> Self {
        Self {
            registry: Arc::new(registry),
            options,
        }
    }

    /// Builds the role registry and options described by a configuration.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or its role table is malformed.
    pub fn from_config(config: &PalisadeConfig) -> Result<Self> {
        config.validate()?;
        let registry = config.role_registry()?;

        info!(
            project = %config.project.name,
            roles = registry.len(),
            reserved_prefix = %config.enforcement.reserved_prefix,
            audit = config.enforcement.audit,
            "Authorization configured"
        );

        Ok(Self::new(
            registry,
            GuardOptions {
                reserved_prefix: config.enforcement.reserved_prefix.clone(),
                audit: config.enforcement.audit,
            },
        ))
    }

    /// Disables audit logging (for testing).
    #[must_use]
    pub fn without_audit(mut self) -> Self {
        self.options = self.options.without_audit();
        self
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    /// A decision engine over this registry.
    pub fn engine(&self) -> DecisionEngine {
        DecisionEngine::new(Arc::clone(&self.registry))
    }

    /// Wraps every field of `graph` with its guard.
    ///
    /// # Errors
    ///
    /// Returns a schema error for malformed annotations or duplicate
    /// declarations.
    pub fn authorize(&self, graph: SchemaGraph) -> Result<AuthorizedSchema> {
        Ok(AuthorizedSchema::build(
            graph,
            self.engine(),
            self.options.clone(),
        )?)
    }

    /// Reads a JSON schema document and authorizes it.
    ///
    /// Fields without an entry in `resolvers` read the parent object's
    /// property of the same name.
    ///
    /// # Errors
    ///
    /// Fails when the document cannot be read or parsed, or the schema it
    /// describes is malformed.
    pub fn authorize_document(
        &self,
        path: impl AsRef<Path>,
        resolvers: &Resolvers,
    ) -> Result<AuthorizedSchema> {
        let definition = SchemaDefinition::from_path(path.as_ref())?;
        self.authorize(SchemaGraph::from_definition(definition, resolvers))
    }
}

impl Default for Palisade {
    fn default() -> Self {
        Self::standard()
    }
}
