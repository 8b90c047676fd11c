//! # palisade-rbac: Role registry and access decisions
//!
//! Provides the two leaves of the Palisade authorization engine:
//! - **Role registry**: static mapping from role identifier to permissions,
//!   with unknown roles degrading to `anonymous`
//! - **Decision engine**: field-overrides-type evaluation of a principal's
//!   expanded permissions
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Principal (id + roles)                      │
//! └─────────────────┬───────────────────────────┘
//!                   │  expand (registry lookup, + self:anyone)
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  DecisionEngine                              │
//! │  ├─ field requirement, when declared         │
//! │  └─ otherwise the owning type's requirement  │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision (granted, basis, reason)           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Standard Roles
//!
//! | Role              | Permissions                                |
//! |-------------------|--------------------------------------------|
//! | anonymous         |                                            |
//! | customer          | self:customer                              |
//! | employee          | customer:read, customer:write, notes:read  |
//! | employee-readonly | customer:read                              |
//! | roles-editor      | iam:write                                  |
//! | invoice-manager   | invoice:read, invoice:write                |
//! | profile-service   | customer:read                              |
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use palisade_rbac::{DecisionEngine, RoleRegistry};
//! use palisade_types::{Principal, Requirement};
//!
//! let engine = DecisionEngine::new(Arc::new(RoleRegistry::standard()));
//!
//! let read_customers: Requirement = ["customer:read"].into_iter().collect();
//! let employee = Principal::new("u-1").with_role("employee");
//! let customer = Principal::new("u-2").with_role("customer");
//!
//! assert!(engine.is_authorized(&read_customers, &Requirement::empty(), Some(&employee)));
//! assert!(!engine.is_authorized(&read_customers, &Requirement::empty(), Some(&customer)));
//! ```

pub mod decision;
pub mod permissions;
pub mod roles;

pub use decision::{Basis, Decision, DecisionEngine};
pub use permissions::PermissionSet;
pub use roles::{RegistryError, Role, RoleRegistry};
