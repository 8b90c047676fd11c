//! # palisade-types: Core types for `Palisade`
//!
//! Shared value types used across the authorization engine:
//! - Identifiers ([`Permission`], [`RoleId`], [`PrincipalId`])
//! - Callers ([`Principal`])
//! - Declared requirements ([`Requirement`])
//! - Well-known names ([`IMPLICIT_PERMISSION`], [`ANONYMOUS_ROLE`], [`RESERVED_PREFIX`])
//!
//! Permissions are opaque tokens. The engine never looks inside them beyond
//! checking that they are well-formed (non-empty, no whitespace).

use std::collections::BTreeSet;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

// ============================================================================
// Well-known names
// ============================================================================

/// Permission every principal holds, authenticated or not.
///
/// Annotating a field with this permission makes it publicly readable while
/// still counting as an explicit access-control declaration.
pub const IMPLICIT_PERMISSION: &str = "self:anyone";

/// Role that unknown role identifiers degrade to.
pub const ANONYMOUS_ROLE: &str = "anonymous";

/// Sentinel prefix for framework-internal types and fields.
///
/// Names starting with this prefix are exempt from deny-by-default.
pub const RESERVED_PREFIX: &str = "_";

/// Returns whether `name` belongs to the reserved namespace for `prefix`.
///
/// An empty prefix reserves nothing.
pub fn is_reserved(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.starts_with(prefix)
}

// ============================================================================
// Identifiers - cheap string newtypes
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Opaque capability token, e.g. `"customer:read"`.
    Permission
);

string_id!(
    /// Identifier of a role in the registry, e.g. `"employee"`.
    RoleId
);

string_id!(
    /// Identifier of an authenticated caller.
    PrincipalId
);

/// Reasons a permission token is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionFormatError {
    #[error("permission token is empty")]
    Empty,

    #[error("permission token {0:?} contains whitespace")]
    Whitespace(String),
}

impl Permission {
    /// The implicit permission held by every principal.
    pub fn implicit() -> Self {
        Self::new(IMPLICIT_PERMISSION)
    }

    /// Validates and wraps a permission token.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionFormatError`] if the token is empty or contains
    /// whitespace.
    pub fn parse(token: &str) -> Result<Self, PermissionFormatError> {
        if token.is_empty() {
            return Err(PermissionFormatError::Empty);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(PermissionFormatError::Whitespace(token.to_string()));
        }
        Ok(Self::new(token))
    }
}

impl RoleId {
    /// The fallback role.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_ROLE)
    }
}

// ============================================================================
// Principal
// ============================================================================

/// The caller a field access is evaluated for.
///
/// Built per request from the authentication context and dropped at request
/// end. Deserializes from claims shaped `{"id": "...", "roles": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl Principal {
    /// Creates a principal with no roles.
    pub fn new(id: impl Into<PrincipalId>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    /// Appends a role, keeping the declared order.
    pub fn with_role(mut self, role: impl Into<RoleId>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn roles(&self) -> &[RoleId] {
        &self.roles
    }
}

// ============================================================================
// Requirement
// ============================================================================

/// The set of permissions a field or type declares as necessary.
///
/// Any single member grants access. Order and duplicates in the declaration
/// are immaterial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Requirement(BTreeSet<Permission>);

impl Requirement {
    /// A requirement that declares nothing.
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, permission: &Permission) -> bool {
        self.0.contains(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(none)");
        }
        let mut first = true;
        for permission in &self.0 {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            f.write_str(permission.as_str())?;
        }
        Ok(())
    }
}

impl FromIterator<Permission> for Requirement {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for Requirement {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(Permission::from).collect())
    }
}

impl<'a> IntoIterator for &'a Requirement {
    type Item = &'a Permission;
    type IntoIter = std::collections::btree_set::Iter<'a, Permission>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test]
    fn requirement_ignores_order_and_duplicates() {
        let a: Requirement = ["customer:read", "notes:read", "customer:read"]
            .into_iter()
            .collect();
        let b: Requirement = ["notes:read", "customer:read"].into_iter().collect();

        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
        assert!(a.contains(&Permission::from("notes:read")));
    }

    #[test]
    fn empty_requirement_displays_none() {
        assert_eq!(Requirement::empty().to_string(), "(none)");

        let req: Requirement = ["b:read", "a:read"].into_iter().collect();
        assert_eq!(req.to_string(), "a:read | b:read");
    }

    #[test_case("customer:read" => true; "plain token")]
    #[test_case("" => false; "empty token")]
    #[test_case("customer read" => false; "embedded space")]
    #[test_case("customer:read\n" => false; "trailing newline")]
    fn permission_parse(token: &str) -> bool {
        Permission::parse(token).is_ok()
    }

    #[test_case("__schema", "_" => true; "introspection field")]
    #[test_case("_Service", "_" => true; "internal type")]
    #[test_case("customers", "_" => false; "business field")]
    #[test_case("_anything", "" => false; "empty prefix reserves nothing")]
    fn reserved_names(name: &str, prefix: &str) -> bool {
        is_reserved(name, prefix)
    }

    #[test]
    fn principal_from_claims() {
        let claims = r#"{"id": "u-17", "roles": ["employee", "roles-editor"]}"#;
        let principal: Principal = serde_json::from_str(claims).unwrap();

        assert_eq!(principal.id, PrincipalId::from("u-17"));
        assert_eq!(
            principal.roles(),
            &[RoleId::from("employee"), RoleId::from("roles-editor")]
        );
    }

    #[test]
    fn principal_claims_without_roles() {
        let principal: Principal = serde_json::from_str(r#"{"id": "svc"}"#).unwrap();
        assert!(principal.roles().is_empty());
    }

    #[test]
    fn principal_builder_keeps_role_order() {
        let principal = Principal::new("u-1").with_role("b").with_role("a");
        assert_eq!(principal.roles(), &[RoleId::from("b"), RoleId::from("a")]);
    }

    proptest! {
        #[test]
        fn requirement_is_order_insensitive(mut tokens in prop::collection::vec("[a-z]{1,8}:[a-z]{1,8}", 0..8)) {
            let forward: Requirement = tokens.iter().map(String::as_str).collect();
            tokens.reverse();
            let backward: Requirement = tokens.iter().map(String::as_str).collect();
            prop_assert_eq!(&forward, &backward);
            prop_assert!(forward.len() <= tokens.len());
        }
    }
}
