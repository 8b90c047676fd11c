//! Role definitions and the role registry.
//!
//! The registry is a validated, read-only mapping from role identifier to the
//! permissions that role grants. Lookups are total: an identifier that is not
//! in the table resolves to the `anonymous` role instead of failing, so a stale
//! or malformed role claim can never crash a caller.

use std::collections::HashMap;

use palisade_types::{ANONYMOUS_ROLE, Permission, PermissionFormatError, RoleId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::permissions::PermissionSet;

/// Errors raised while building a registry.
///
/// All of them are startup-fatal configuration errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A role was declared with an empty identifier.
    #[error("role identifier must not be empty")]
    EmptyRoleId,

    /// The same role identifier was declared twice.
    #[error("role '{0}' is defined more than once")]
    DuplicateRole(RoleId),

    /// A role grants a malformed permission token.
    #[error("role '{role}' grants an invalid permission: {source}")]
    InvalidPermission {
        role: RoleId,
        source: PermissionFormatError,
    },
}

/// A named bundle of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub permissions: PermissionSet,
}

impl Role {
    pub fn new(id: impl Into<RoleId>, permissions: PermissionSet) -> Self {
        Self {
            id: id.into(),
            permissions,
        }
    }

    /// The empty fallback role.
    pub fn anonymous() -> Self {
        Self::new(RoleId::anonymous(), PermissionSet::empty())
    }
}

/// Process-wide role table.
///
/// Built once at startup and never mutated. Share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: HashMap<RoleId, Role>,
    anonymous: Role,
}

impl RoleRegistry {
    /// Builds a registry from `(role, permissions)` definitions.
    ///
    /// An empty `anonymous` role is added when the definitions do not
    /// declare one.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for empty role identifiers, duplicate roles
    /// and malformed permission tokens.
    pub fn new<I, R, P, S>(definitions: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (R, P)>,
        R: Into<RoleId>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roles = HashMap::new();

        for (id, permissions) in definitions {
            let id: RoleId = id.into();
            if id.as_str().is_empty() {
                return Err(RegistryError::EmptyRoleId);
            }

            let mut set = PermissionSet::empty();
            for token in permissions {
                let permission = Permission::parse(token.as_ref()).map_err(|source| {
                    RegistryError::InvalidPermission {
                        role: id.clone(),
                        source,
                    }
                })?;
                set.grant(permission);
            }

            if roles.contains_key(&id) {
                return Err(RegistryError::DuplicateRole(id));
            }
            roles.insert(id.clone(), Role::new(id, set));
        }

        Ok(Self::from_roles(roles))
    }

    /// Returns the built-in role table.
    pub fn standard() -> Self {
        let table: [(&str, &[&str]); 7] = [
            (ANONYMOUS_ROLE, &[]),
            ("customer", &["self:customer"]),
            ("employee", &["customer:read", "customer:write", "notes:read"]),
            ("employee-readonly", &["customer:read"]),
            ("roles-editor", &["iam:write"]),
            ("invoice-manager", &["invoice:read", "invoice:write"]),
            ("profile-service", &["customer:read"]),
        ];

        let roles = table
            .into_iter()
            .map(|(id, permissions)| {
                let role = Role::new(id, permissions.iter().copied().collect());
                (role.id.clone(), role)
            })
            .collect();

        Self::from_roles(roles)
    }

    fn from_roles(mut roles: HashMap<RoleId, Role>) -> Self {
        let anonymous = roles
            .entry(RoleId::anonymous())
            .or_insert_with(Role::anonymous)
            .clone();
        Self { roles, anonymous }
    }

    /// Looks up a role, degrading unknown identifiers to `anonymous`.
    pub fn lookup(&self, id: &RoleId) -> &Role {
        self.roles.get(id).unwrap_or_else(|| {
            debug!(role = %id, "Unknown role treated as anonymous");
            &self.anonymous
        })
    }

    /// Returns whether the identifier is defined in the table.
    pub fn contains(&self, id: &RoleId) -> bool {
        self.roles.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns all roles, sorted by identifier.
    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        let mut roles: Vec<&Role> = self.roles.values().collect();
        roles.sort_by(|a, b| a.id.cmp(&b.id));
        roles.into_iter()
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
