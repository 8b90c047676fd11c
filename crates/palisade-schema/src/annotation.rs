//! The `auth` annotation carried by types and fields.
//!
//! An annotation is the already-parsed form of a schema directive such as
//! `@auth(permissions: ["customer:read"])`. Absence is equivalent to an empty
//! permission list.

use palisade_types::{Permission, Requirement};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Declared permission requirement, as written in the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAnnotation {
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AuthAnnotation {
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates the annotation into a [`Requirement`].
    ///
    /// `owner` names the annotated type or field in the error.
    pub fn to_requirement(&self, owner: &str) -> Result<Requirement> {
        self.permissions
            .iter()
            .map(|token| {
                Permission::parse(token).map_err(|source| SchemaError::MalformedAnnotation {
                    owner: owner.to_string(),
                    source,
                })
            })
            .collect()
    }
}

/// Reads an optional annotation; absence yields the empty requirement.
pub fn requirement_of(annotation: Option<&AuthAnnotation>, owner: &str) -> Result<Requirement> {
    annotation.map_or_else(|| Ok(Requirement::empty()), |a| a.to_requirement(owner))
}
