//! Permission sets.
//!
//! A [`PermissionSet`] is what a role grants, and what a principal holds once
//! its roles have been expanded.

use std::collections::BTreeSet;

use palisade_types::{Permission, Requirement};
use serde::{Deserialize, Serialize};

/// Set of permissions granted to a role or held by a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<Permission>,
}

impl PermissionSet {
    /// Creates a new permission set.
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Creates an empty permission set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns whether this set contains the given permission.
    pub fn contains(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Adds a permission to the set. Granting twice is a no-op.
    pub fn grant(&mut self, permission: Permission) {
        self.permissions.insert(permission);
    }

    /// Adds every permission of `other` to this set.
    pub fn extend(&mut self, other: &PermissionSet) {
        self.permissions.extend(other.permissions.iter().cloned());
    }

    /// Returns whether any permission of the requirement is held.
    ///
    /// An empty requirement is never satisfied.
    pub fn satisfies(&self, requirement: &Requirement) -> bool {
        requirement.iter().any(|p| self.permissions.contains(p))
    }

    /// Returns all permissions in the set.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> FromIterator<&'a str> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Permission::from))
    }
}
