//! Access decision engine.
//!
//! Decides whether a principal may access a field, given the field's own
//! requirement and the requirement of the type that owns it:
//!
//! 1. The principal's roles are expanded into a [`PermissionSet`], plus the
//!    implicit [`IMPLICIT_PERMISSION`].
//! 2. A non-empty field requirement alone determines the outcome.
//! 3. Otherwise a non-empty type requirement determines the outcome.
//! 4. With nothing declared anywhere the answer is "deny". Under the
//!    deny-by-default policy such fields never reach the engine.
//!
//! The engine is stateless apart from the read-only registry it was built
//! with, so it can be shared freely across tasks.

use std::fmt;
use std::sync::Arc;

use palisade_types::{IMPLICIT_PERMISSION, Permission, Principal, Requirement};

use crate::permissions::PermissionSet;
use crate::roles::RoleRegistry;

// ============================================================================
// Decision
// ============================================================================

/// Which requirement an outcome was decided against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Basis {
    /// The field's own requirement.
    Field,
    /// The owning type's requirement (field declared nothing).
    Type,
    /// Neither declared anything.
    Undeclared,
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::Field => f.write_str("field requirement"),
            Basis::Type => f.write_str("type requirement"),
            Basis::Undeclared => f.write_str("no requirement"),
        }
    }
}

/// The outcome of evaluating one access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub granted: bool,
    pub basis: Basis,
    /// Human-readable explanation of why this decision was made.
    pub reason: String,
}

// ============================================================================
// Engine
// ============================================================================

/// Stateless decision procedure over a shared [`RoleRegistry`].
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    registry: Arc<RoleRegistry>,
}

impl DecisionEngine {
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// The shared handle to the registry, for identity comparisons.
    pub fn shared_registry(&self) -> &Arc<RoleRegistry> {
        &self.registry
    }

    /// Expands a principal into the permissions it holds.
    ///
    /// Unknown roles contribute the `anonymous` role's permissions. The
    /// implicit permission is always present, including for an absent
    /// (anonymous) principal.
    pub fn expand(&self, principal: Option<&Principal>) -> PermissionSet {
        let mut held = PermissionSet::empty();
        held.grant(Permission::new(IMPLICIT_PERMISSION));

        for role_id in principal.map(Principal::roles).unwrap_or_default() {
            held.extend(&self.registry.lookup(role_id).permissions);
        }

        held
    }

    /// Returns whether the principal may access a field.
    pub fn is_authorized(
        &self,
        field: &Requirement,
        owner: &Requirement,
        principal: Option<&Principal>,
    ) -> bool {
        self.is_authorized_with(field, owner, &self.expand(principal))
    }

    /// Same as [`is_authorized`](Self::is_authorized) for callers that
    /// already expanded the principal.
    pub fn is_authorized_with(
        &self,
        field: &Requirement,
        owner: &Requirement,
        held: &PermissionSet,
    ) -> bool {
        self.decide_with(field, owner, held).granted
    }

    /// Evaluates an access and explains the outcome.
    pub fn decide(
        &self,
        field: &Requirement,
        owner: &Requirement,
        principal: Option<&Principal>,
    ) -> Decision {
        self.decide_with(field, owner, &self.expand(principal))
    }

    /// Evaluates an access against an already expanded permission set.
    #[allow(clippy::unused_self)]
    pub fn decide_with(
        &self,
        field: &Requirement,
        owner: &Requirement,
        held: &PermissionSet,
    ) -> Decision {
        let (requirement, basis) = if !field.is_empty() {
            (field, Basis::Field)
        } else if !owner.is_empty() {
            (owner, Basis::Type)
        } else {
            return Decision {
                granted: false,
                basis: Basis::Undeclared,
                reason: "no permission requirement declared".to_string(),
            };
        };

        let granted = held.satisfies(requirement);
        let reason = if granted {
            format!("{basis} [{requirement}] satisfied")
        } else {
            format!("{basis} [{requirement}] not satisfied")
        };

        Decision {
            granted,
            basis,
            reason,
        }
    }
}
