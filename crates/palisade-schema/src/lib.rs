//! # palisade-schema: Descriptor graph and permission index
//!
//! The typed, explicit description of a schema that the guard layer wraps:
//!
//! - [`SchemaGraph`], [`TypeDescriptor`], [`FieldDescriptor`]: object types,
//!   their fields, `auth` annotations and resolution logic
//! - [`SchemaDefinition`]: the serializable JSON form of a graph
//! - [`Resolver`]: the async contract for field business logic
//! - [`ExecutionContext`]: per-request principal with memoized permissions
//! - [`PermissionIndex`]: type name to declared requirement, built once
//!
//! ```
//! use palisade_schema::{FieldDescriptor, PermissionIndex, SchemaGraph, TypeDescriptor};
//!
//! let graph = SchemaGraph::new().with_type(
//!     TypeDescriptor::new("Customer")
//!         .with_auth(["self:customer", "customer:read"])
//!         .with_field(FieldDescriptor::new("email")),
//! );
//!
//! let index = PermissionIndex::build(&graph).unwrap();
//! assert_eq!(index.requirement("Customer").len(), 2);
//! ```

pub mod annotation;
pub mod context;
pub mod definition;
pub mod descriptor;
pub mod error;
pub mod index;
pub mod resolver;

pub use annotation::{AuthAnnotation, requirement_of};
pub use context::ExecutionContext;
pub use definition::{
    DefinitionError, FieldDefinition, Resolvers, SchemaDefinition, TypeDefinition,
};
pub use descriptor::{FieldDescriptor, SchemaGraph, TypeDescriptor};
pub use error::SchemaError;
pub use index::PermissionIndex;
pub use resolver::{
    FieldCall, FnResolver, PropertyResolver, ResolveError, Resolver, SharedResolver, resolver_fn,
};
