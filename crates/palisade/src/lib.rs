//! # Palisade
//!
//! Deny-by-default, field-level authorization for schema-driven APIs.
//!
//! Every field of a schema is classified once, before serving:
//!
//! - **Guarded** - the field or its type declares the permissions it needs;
//!   each resolution checks the caller's roles first
//! - **Denied by default** - nothing is declared anywhere; every resolution
//!   fails with a configuration error
//! - **Passthrough** - reserved (`_`-prefixed) names are never checked
//!
//! A field's own requirement overrides its type's. Every caller, including
//! an anonymous one, holds `self:anyone`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            Palisade                              │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────────────┐  │
//! │  │ SchemaGraph │ → │ Permission   │ → │ AuthorizedSchema     │  │
//! │  │ (+ @auth)   │   │ Index        │   │ (guard per field)    │  │
//! │  └─────────────┘   └──────────────┘   └──────────┬───────────┘  │
//! │                                                   │ resolve      │
//! │  ┌─────────────┐   ┌──────────────┐              ▼              │
//! │  │ RoleRegistry│ → │ Decision     │ ←── ExecutionContext         │
//! │  │             │   │ Engine       │     (principal)              │
//! │  └─────────────┘   └──────────────┘                              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use palisade::{
//!     ExecutionContext, FieldDescriptor, FieldError, Palisade, Principal, SchemaGraph,
//!     TypeDescriptor,
//! };
//! use serde_json::{Value, json};
//!
//! let graph = SchemaGraph::new()
//!     .with_type(
//!         TypeDescriptor::new("Query")
//!             .with_field(FieldDescriptor::new("health").with_auth(["self:anyone"]))
//!             .with_field(FieldDescriptor::new("report")),
//!     )
//!     .with_type(
//!         TypeDescriptor::new("Customer")
//!             .with_auth(["self:customer", "customer:read"])
//!             .with_field(FieldDescriptor::new("email")),
//!     );
//!
//! let schema = Palisade::standard().authorize(graph)?;
//! let anonymous = ExecutionContext::anonymous();
//! let employee = ExecutionContext::for_principal(Principal::new("e-1").with_role("employee"));
//!
//! # block_on(async {
//! let health = schema
//!     .resolve_field("Query", "health", &json!({"health": "OK"}), &Value::Null, &anonymous)
//!     .await;
//! assert_eq!(health, Ok(json!("OK")));
//!
//! let report = schema
//!     .resolve_field("Query", "report", &Value::Null, &Value::Null, &employee)
//!     .await;
//! assert!(matches!(report, Err(FieldError::Configuration { .. })));
//!
//! let customer = json!({"email": "ada@example.com"});
//! let email = schema
//!     .resolve_field("Customer", "email", &customer, &Value::Null, &employee)
//!     .await;
//! assert_eq!(email, Ok(json!("ada@example.com")));
//! # });
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! # Ok::<(), palisade::PalisadeError>(())
//! ```
//!
//! # Modules
//!
//! - **SDK Layer**: [`Palisade`] - configuration to authorized schema
//! - **Foundation**: permissions, roles, principals, decisions
//! - **Schema**: descriptor graph, annotations, resolvers
//! - **Enforcement**: guards and the authorized schema

mod error;
mod palisade;

// SDK Layer - Main API
pub use crate::palisade::Palisade;
pub use error::{PalisadeError, Result};

// Re-export core types
pub use palisade_types::{
    IMPLICIT_PERMISSION, Permission, PermissionFormatError, Principal, PrincipalId,
    RESERVED_PREFIX, Requirement, RoleId,
};

// Re-export roles and decisions
pub use palisade_rbac::{
    Basis, Decision, DecisionEngine, PermissionSet, RegistryError, Role, RoleRegistry,
};

// Re-export the schema model
pub use palisade_schema::{
    AuthAnnotation, DefinitionError, ExecutionContext, FieldCall, FieldDefinition,
    FieldDescriptor, PermissionIndex, PropertyResolver, ResolveError, Resolver, Resolvers,
    SchemaDefinition, SchemaError, SchemaGraph, SharedResolver, TypeDefinition, TypeDescriptor,
    resolver_fn,
};

// Re-export enforcement
pub use palisade_guard::{
    AuthorizedSchema, FieldError, FieldGuard, FieldRequest, GuardKind, GuardOptions,
    GuardSummary, GuardedField,
};

// Re-export configuration
pub use palisade_config::{ConfigLoader, PalisadeConfig};
