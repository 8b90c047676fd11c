//! The authorized schema: every field of a descriptor graph, wrapped.

use std::collections::BTreeMap;

use futures::future::join_all;
use palisade_rbac::DecisionEngine;
use palisade_schema::{ExecutionContext, PermissionIndex, SchemaError, SchemaGraph};
use serde_json::Value;
use tracing::info;

use crate::error::{FieldError, Result};
use crate::interceptor::{GuardKind, GuardedField, install};
use crate::options::GuardOptions;

/// One entry of a sibling-field batch.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRequest {
    pub field: String,
    pub args: Value,
}

impl FieldRequest {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            args: Value::Null,
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

/// Counts of install-time decisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuardSummary {
    pub types: usize,
    pub guarded: usize,
    pub passthrough: usize,
    pub denied_by_default: usize,
}

/// An immutable schema whose fields all carry their install-time guard.
///
/// Built once before serving and shared (for example behind an `Arc`)
/// across every request.
#[derive(Debug)]
pub struct AuthorizedSchema {
    engine: DecisionEngine,
    options: GuardOptions,
    index: PermissionIndex,
    types: BTreeMap<String, BTreeMap<String, GuardedField>>,
}

impl AuthorizedSchema {
    /// Indexes the graph and installs a guard on every field of every type.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for malformed annotations or duplicate
    /// declarations. Nothing is served from a schema that fails to build.
    pub fn build(
        graph: SchemaGraph,
        engine: DecisionEngine,
        options: GuardOptions,
    ) -> std::result::Result<Self, SchemaError> {
        let index = PermissionIndex::build(&graph)?;
        let mut types = BTreeMap::new();

        for descriptor in graph.into_types() {
            let owner = index.requirement(&descriptor.name);
            let mut fields = BTreeMap::new();
            for mut field in descriptor.fields {
                field.owner.clone_from(&descriptor.name);
                let guarded = install(field, owner, &options)?;
                fields.insert(guarded.field_name.clone(), guarded);
            }
            types.insert(descriptor.name, fields);
        }

        let schema = Self {
            engine,
            options,
            index,
            types,
        };

        let summary = schema.summary();
        info!(
            types = summary.types,
            guarded = summary.guarded,
            passthrough = summary.passthrough,
            denied_by_default = summary.denied_by_default,
            "Authorized schema built"
        );

        Ok(schema)
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn options(&self) -> &GuardOptions {
        &self.options
    }

    pub fn index(&self) -> &PermissionIndex {
        &self.index
    }

    /// Returns the installed field, if the schema declares it.
    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&GuardedField> {
        self.types.get(type_name)?.get(field_name)
    }

    /// Every installed field, sorted by type then field name.
    pub fn guards(&self) -> impl Iterator<Item = &GuardedField> {
        self.types.values().flat_map(BTreeMap::values)
    }

    /// Fields whose logic was replaced by the deny-by-default policy.
    pub fn denied_by_default(&self) -> impl Iterator<Item = &GuardedField> {
        self.guards()
            .filter(|field| field.kind() == GuardKind::AlwaysDenied)
    }

    pub fn summary(&self) -> GuardSummary {
        self.guards().fold(
            GuardSummary {
                types: self.types.len(),
                ..GuardSummary::default()
            },
            |mut summary, field| {
                match field.kind() {
                    GuardKind::Guarded => summary.guarded += 1,
                    GuardKind::Passthrough => summary.passthrough += 1,
                    GuardKind::AlwaysDenied => summary.denied_by_default += 1,
                }
                summary
            },
        )
    }

    /// Resolves one field of `source`, an object of type `type_name`.
    ///
    /// # Errors
    ///
    /// [`FieldError::UnknownField`] when the schema does not declare
    /// `type_name.field_name`; otherwise as [`GuardedField::resolve`].
    pub async fn resolve_field(
        &self,
        type_name: &str,
        field_name: &str,
        source: &Value,
        args: &Value,
        context: &ExecutionContext,
    ) -> Result<Value> {
        let field = self
            .field(type_name, field_name)
            .ok_or_else(|| FieldError::UnknownField {
                type_name: type_name.to_string(),
                field_name: field_name.to_string(),
            })?;

        field
            .resolve(&self.engine, &self.options, source, args, context)
            .await
    }

    /// Resolves sibling fields of one object concurrently.
    ///
    /// Results keep the order of `requests`. Each field fails or succeeds
    /// on its own.
    pub async fn resolve_fields(
        &self,
        type_name: &str,
        source: &Value,
        requests: &[FieldRequest],
        context: &ExecutionContext,
    ) -> Vec<Result<Value>> {
        join_all(requests.iter().map(|request| {
            self.resolve_field(type_name, &request.field, source, &request.args, context)
        }))
        .await
    }
}
