//! Type-level permission index.
//!
//! Built once before serving: walks every object type exactly once, parses
//! its `auth` annotation and records the resulting [`Requirement`] keyed by
//! type name. Field annotations are validated here too so that a malformed
//! schema fails at startup rather than on the first request.

use std::collections::{HashMap, HashSet};

use palisade_types::Requirement;
use tracing::debug;

use crate::annotation::requirement_of;
use crate::descriptor::SchemaGraph;
use crate::error::{Result, SchemaError};

static EMPTY_REQUIREMENT: Requirement = Requirement::empty();

/// Mapping from type name to the type's declared requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionIndex {
    by_type: HashMap<String, Requirement>,
}

impl PermissionIndex {
    /// Builds the index from a descriptor graph.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for an empty or duplicate type name, a
    /// duplicate field name, or a malformed annotation on any type or field.
    pub fn build(graph: &SchemaGraph) -> Result<Self> {
        let mut by_type = HashMap::with_capacity(graph.len());

        for descriptor in graph.types() {
            if descriptor.name.is_empty() {
                return Err(SchemaError::EmptyName("type declaration".to_string()));
            }
            if by_type.contains_key(&descriptor.name) {
                return Err(SchemaError::DuplicateType(descriptor.name.clone()));
            }

            let mut seen = HashSet::with_capacity(descriptor.fields.len());
            for field in &descriptor.fields {
                if field.name.is_empty() {
                    return Err(SchemaError::EmptyName(format!("type {}", descriptor.name)));
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        type_name: descriptor.name.clone(),
                        field_name: field.name.clone(),
                    });
                }
                let owner = format!("{}.{}", descriptor.name, field.name);
                requirement_of(field.auth.as_ref(), &owner)?;
            }

            let requirement = requirement_of(descriptor.auth.as_ref(), &descriptor.name)?;
            debug!(
                type_name = %descriptor.name,
                requirement = %requirement,
                fields = descriptor.fields.len(),
                "Indexed type"
            );
            by_type.insert(descriptor.name.clone(), requirement);
        }

        Ok(Self { by_type })
    }

    /// Returns the type's requirement; unknown types have none.
    pub fn requirement(&self, type_name: &str) -> &Requirement {
        self.by_type.get(type_name).unwrap_or(&EMPTY_REQUIREMENT)
    }

    pub fn get(&self, type_name: &str) -> Option<&Requirement> {
        self.by_type.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    /// Iterates entries sorted by type name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Requirement)> {
        let mut entries: Vec<_> = self
            .by_type
            .iter()
            .map(|(name, requirement)| (name.as_str(), requirement))
            .collect();
        entries.sort_by_key(|(name, _)| *name);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, TypeDescriptor};
    use palisade_types::Permission;
    use proptest::prelude::*;

    fn customer_graph() -> SchemaGraph {
        SchemaGraph::new()
            .with_type(
                TypeDescriptor::new("Query")
                    .with_field(FieldDescriptor::new("customers").with_auth(["customer:read"])),
            )
            .with_type(
                TypeDescriptor::new("Customer")
                    .with_auth(["self:customer", "customer:read"])
                    .with_field(FieldDescriptor::new("id")),
            )
    }

    #[test]
    fn records_every_type() {
        let index = PermissionIndex::build(&customer_graph()).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.requirement("Query").is_empty());
        assert!(
            index
                .requirement("Customer")
                .contains(&Permission::from("self:customer"))
        );
    }

    #[test]
    fn unknown_type_has_empty_requirement() {
        let index = PermissionIndex::build(&customer_graph()).unwrap();

        assert!(index.get("Invoice").is_none());
        assert!(index.requirement("Invoice").is_empty());
    }

    #[test]
    fn iter_is_sorted() {
        let index = PermissionIndex::build(&customer_graph()).unwrap();
        let names: Vec<_> = index.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["Customer", "Query"]);
    }

    #[test]
    fn duplicate_type_is_rejected() {
        let graph = customer_graph().with_type(TypeDescriptor::new("Query"));
        let err = PermissionIndex::build(&graph).unwrap_err();

        assert!(matches!(err, SchemaError::DuplicateType(name) if name == "Query"));
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let graph = SchemaGraph::new().with_type(
            TypeDescriptor::new("Customer")
                .with_field(FieldDescriptor::new("email"))
                .with_field(FieldDescriptor::new("email")),
        );
        let err = PermissionIndex::build(&graph).unwrap_err();

        assert!(matches!(
            err,
            SchemaError::DuplicateField { type_name, field_name }
                if type_name == "Customer" && field_name == "email"
        ));
    }

    #[test]
    fn malformed_field_annotation_fails_at_build() {
        let graph = SchemaGraph::new().with_type(
            TypeDescriptor::new("Query")
                .with_field(FieldDescriptor::new("customers").with_auth(["customer read"])),
        );
        let err = PermissionIndex::build(&graph).unwrap_err();

        assert!(matches!(
            err,
            SchemaError::MalformedAnnotation { ref owner, .. } if owner == "Query.customers"
        ));
    }

    #[test]
    fn empty_type_name_is_rejected() {
        let graph = SchemaGraph::new().with_type(TypeDescriptor::new(""));
        assert!(matches!(
            PermissionIndex::build(&graph),
            Err(SchemaError::EmptyName(_))
        ));
    }

    proptest! {
        #[test]
        fn build_is_idempotent(
            types in prop::collection::btree_map(
                "[A-Z][a-z]{1,8}",
                prop::collection::vec("[a-z]{1,6}:[a-z]{1,6}", 0..4),
                0..8,
            )
        ) {
            let graph = types.iter().fold(SchemaGraph::new(), |graph, (name, perms)| {
                graph.with_type(TypeDescriptor::new(name.clone()).with_auth(perms.clone()))
            });

            let first = PermissionIndex::build(&graph).unwrap();
            let second = PermissionIndex::build(&graph).unwrap();

            prop_assert_eq!(first.len(), types.len());
            prop_assert_eq!(first, second);
        }
    }
}
