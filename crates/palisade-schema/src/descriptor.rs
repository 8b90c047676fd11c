//! Statically typed schema descriptor graph.
//!
//! The graph is built explicitly by the application (or from a
//! [`SchemaDefinition`](crate::SchemaDefinition)) and handed to the guard
//! layer once. Nothing inspects a live schema at runtime.

use std::fmt;
use std::sync::Arc;

use crate::annotation::AuthAnnotation;
use crate::resolver::{PropertyResolver, Resolver, SharedResolver};

// ============================================================================
// Fields
// ============================================================================

/// One field of an object type.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub name: String,
    /// Name of the owning type. Set by [`TypeDescriptor::with_field`].
    pub owner: String,
    pub auth: Option<AuthAnnotation>,
    pub resolver: SharedResolver,
}

impl FieldDescriptor {
    /// Creates a field resolved by the default property resolver.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: String::new(),
            auth: None,
            resolver: Arc::new(PropertyResolver),
        }
    }

    /// Attaches an `auth` annotation listing `permissions`.
    #[must_use]
    pub fn with_auth<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth = Some(AuthAnnotation::new(permissions));
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, auth: Option<AuthAnnotation>) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn resolved_by(mut self, resolver: SharedResolver) -> Self {
        self.resolver = resolver;
        self
    }

    #[must_use]
    pub fn with_resolver<R: Resolver + 'static>(self, resolver: R) -> Self {
        self.resolved_by(Arc::new(resolver))
    }

    /// `Type.field`, as used in logs and errors.
    pub fn path(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Types
// ============================================================================

/// An object type and its fields, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TypeDescriptor {
    pub name: String,
    pub auth: Option<AuthAnnotation>,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auth: None,
            fields: Vec::new(),
        }
    }

    /// Attaches a type-level `auth` annotation.
    #[must_use]
    pub fn with_auth<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auth = Some(AuthAnnotation::new(permissions));
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, auth: Option<AuthAnnotation>) -> Self {
        self.auth = auth;
        self
    }

    /// Adds a field owned by this type.
    #[must_use]
    pub fn with_field(mut self, mut field: FieldDescriptor) -> Self {
        field.owner.clone_from(&self.name);
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ============================================================================
// Graph
// ============================================================================

/// The complete set of object types of a schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    types: Vec<TypeDescriptor>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn into_types(self) -> Vec<TypeDescriptor> {
        self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
