//! Serializable schema documents.
//!
//! A [`SchemaDefinition`] is the on-disk form of a descriptor graph: types,
//! fields and their `auth` annotations. Resolution logic is attached by name
//! through [`Resolvers`]; fields without an entry use the property resolver.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::annotation::AuthAnnotation;
use crate::descriptor::{FieldDescriptor, SchemaGraph, TypeDescriptor};
use crate::resolver::SharedResolver;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthAnnotation>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthAnnotation>,
}

/// Errors reading a schema document.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("failed to read schema document {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid schema document: {0}")]
    Parse(#[from] serde_json::Error),
}

impl SchemaDefinition {
    /// Parses a JSON schema document.
    pub fn from_json(input: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Reads and parses a JSON schema document from disk.
    pub fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}

/// Resolution logic keyed by `(type, field)`.
#[derive(Default)]
pub struct Resolvers {
    entries: HashMap<(String, String), SharedResolver>,
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(
        mut self,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
        resolver: SharedResolver,
    ) -> Self {
        self.entries
            .insert((type_name.into(), field_name.into()), resolver);
        self
    }

    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&SharedResolver> {
        self.entries
            .get(&(type_name.to_string(), field_name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered `Type.field` paths the document does not declare, sorted.
    pub fn unmatched(&self, definition: &SchemaDefinition) -> Vec<String> {
        let mut paths: Vec<String> = self
            .entries
            .keys()
            .filter(|(type_name, field_name)| {
                !definition.types.iter().any(|t| {
                    t.name == *type_name && t.fields.iter().any(|f| f.name == *field_name)
                })
            })
            .map(|(type_name, field_name)| format!("{type_name}.{field_name}"))
            .collect();
        paths.sort();
        paths
    }
}

impl std::fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self
            .entries
            .keys()
            .map(|(t, field)| format!("{t}.{field}"))
            .collect();
        keys.sort();
        f.debug_struct("Resolvers").field("fields", &keys).finish()
    }
}

impl SchemaGraph {
    /// Builds a descriptor graph from a document, attaching resolvers.
    pub fn from_definition(definition: SchemaDefinition, resolvers: &Resolvers) -> Self {
        for path in resolvers.unmatched(&definition) {
            warn!(field = %path, "Resolver registered for an undeclared field");
        }

        definition
            .types
            .into_iter()
            .fold(SchemaGraph::new(), |graph, def| {
                let mut descriptor = TypeDescriptor::new(def.name).with_annotation(def.auth);
                for field in def.fields {
                    let mut built = FieldDescriptor::new(field.name).with_annotation(field.auth);
                    if let Some(resolver) = resolvers.get(&descriptor.name, &built.name) {
                        built = built.resolved_by(resolver.clone());
                    }
                    descriptor = descriptor.with_field(built);
                }
                graph.with_type(descriptor)
            })
    }
}
