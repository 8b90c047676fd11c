//! Per-request execution context.

use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use palisade_rbac::{DecisionEngine, PermissionSet, RoleRegistry};
use palisade_types::Principal;

/// Context shared by every field resolution of one request.
///
/// Carries the optional principal placed there by the authentication layer.
/// The principal's expanded permissions are computed at most once per
/// request; role membership cannot change while the request is in flight.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    principal: Option<Principal>,
    expanded: OnceLock<(Arc<RoleRegistry>, PermissionSet)>,
}

impl ExecutionContext {
    /// Context for an unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for an authenticated caller.
    pub fn for_principal(principal: Principal) -> Self {
        Self::new(Some(principal))
    }

    pub fn new(principal: Option<Principal>) -> Self {
        Self {
            principal,
            expanded: OnceLock::new(),
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Returns the principal's expanded permissions, expanding on first use.
    ///
    /// The set is cached against the registry of the first engine to ask.
    /// An engine over a different registry gets a fresh expansion.
    pub fn permissions(&self, engine: &DecisionEngine) -> Cow<'_, PermissionSet> {
        let (registry, held) = self.expanded.get_or_init(|| {
            (
                Arc::clone(engine.shared_registry()),
                engine.expand(self.principal.as_ref()),
            )
        });

        if Arc::ptr_eq(registry, engine.shared_registry()) {
            Cow::Borrowed(held)
        } else {
            Cow::Owned(engine.expand(self.principal.as_ref()))
        }
    }
}
