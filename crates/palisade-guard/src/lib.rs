//! # palisade-guard: Field-level authorization for a schema
//!
//! Wraps every field of a [`SchemaGraph`](palisade_schema::SchemaGraph) once,
//! at construction, with a guard decided from its declared requirements:
//!
//! - **Guarded**: the field (or, failing that, its type) declares
//!   permissions. Each call consults the
//!   [`DecisionEngine`](palisade_rbac::DecisionEngine) before running the
//!   original logic.
//! - **AlwaysDenied**: nothing is declared anywhere. Every call fails with
//!   [`FieldError::Configuration`] (deny by default).
//! - **Passthrough**: the field or type name is reserved (`_` prefix). The
//!   original logic runs unchecked.
//!
//! Errors are scoped to a single field; sibling fields resolve on their own.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use palisade_guard::{AuthorizedSchema, FieldError, GuardOptions};
//! use palisade_rbac::{DecisionEngine, RoleRegistry};
//! use palisade_schema::{ExecutionContext, FieldDescriptor, SchemaGraph, TypeDescriptor};
//! use palisade_types::Principal;
//! use serde_json::{Value, json};
//!
//! # futures::executor::block_on(async {
//! let graph = SchemaGraph::new().with_type(
//!     TypeDescriptor::new("Query")
//!         .with_field(FieldDescriptor::new("customers").with_auth(["customer:read"])),
//! );
//! let schema = AuthorizedSchema::build(
//!     graph,
//!     DecisionEngine::new(Arc::new(RoleRegistry::standard())),
//!     GuardOptions::default(),
//! )
//! .unwrap();
//!
//! let source = json!({"customers": []});
//! let employee = ExecutionContext::for_principal(Principal::new("e-1").with_role("employee"));
//! let customer = ExecutionContext::for_principal(Principal::new("c-1").with_role("customer"));
//!
//! let granted = schema.resolve_field("Query", "customers", &source, &Value::Null, &employee).await;
//! assert_eq!(granted, Ok(json!([])));
//!
//! let denied = schema.resolve_field("Query", "customers", &source, &Value::Null, &customer).await;
//! assert!(matches!(denied, Err(FieldError::AccessDenied { .. })));
//! # });
//! ```

pub mod error;
pub mod interceptor;
pub mod options;
pub mod schema;

pub use error::FieldError;
pub use interceptor::{FieldGuard, GuardKind, GuardedField, install};
pub use options::GuardOptions;
pub use schema::{AuthorizedSchema, FieldRequest, GuardSummary};
