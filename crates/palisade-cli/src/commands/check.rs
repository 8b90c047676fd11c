//! Check command: resolve one field for a principal.

use std::path::Path;

use anyhow::{Context, Result};
use palisade::{ExecutionContext, FieldGuard, Palisade, Principal, Resolvers};
use serde_json::{Value, json};

use crate::style::{print_error, print_labeled, print_success};

/// Splits `Type.field`.
fn parse_target(target: &str) -> Result<(&str, &str)> {
    match target.split_once('.') {
        Some((type_name, field_name)) if !type_name.is_empty() && !field_name.is_empty() => {
            Ok((type_name, field_name))
        }
        _ => anyhow::bail!("Expected a field as Type.field, got '{target}'"),
    }
}

fn principal(subject: Option<&str>, roles: &[String]) -> Option<Principal> {
    if subject.is_none() && roles.is_empty() {
        return None;
    }
    let principal = Principal::new(subject.unwrap_or("cli"));
    Some(
        roles
            .iter()
            .fold(principal, |principal, role| principal.with_role(role.as_str())),
    )
}

pub fn run(
    palisade: &Palisade,
    schema_path: &Path,
    target: &str,
    subject: Option<&str>,
    roles: &[String],
) -> Result<()> {
    let (type_name, field_name) = parse_target(target)?;

    let schema = palisade
        .authorize_document(schema_path, &Resolvers::new())
        .with_context(|| format!("Failed to authorize {}", schema_path.display()))?;

    let context = ExecutionContext::new(principal(subject, roles));

    print_labeled(
        "Principal",
        &context
            .principal()
            .map_or_else(|| "anonymous".to_string(), |p| p.id.to_string()),
    );
    if let Some(FieldGuard::Guarded { field, owner, .. }) =
        schema.field(type_name, field_name).map(|f| &f.guard)
    {
        let decision = schema
            .engine()
            .decide_with(field, owner, &context.permissions(schema.engine()));
        print_labeled("Decision", &decision.reason);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let source = json!({});
    let result = runtime.block_on(schema.resolve_field(
        type_name,
        field_name,
        &source,
        &Value::Null,
        &context,
    ));

    match result {
        Ok(_) => {
            print_success(&format!("Granted: {type_name}.{field_name}"));
            Ok(())
        }
        Err(err) => {
            print_error(&format!("Denied: {err}"));
            Err(anyhow::Error::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_splits_on_first_dot() {
        assert_eq!(parse_target("Query.customers").unwrap(), ("Query", "customers"));
        assert!(parse_target("Query").is_err());
        assert!(parse_target(".customers").is_err());
        assert!(parse_target("Query.").is_err());
    }

    #[test]
    fn principal_is_anonymous_without_subject_or_roles() {
        assert!(principal(None, &[]).is_none());

        let with_role = principal(None, &["employee".to_string()]).unwrap();
        assert_eq!(with_role.id.as_str(), "cli");
        assert_eq!(with_role.roles().len(), 1);

        let subject = principal(Some("u-7"), &[]).unwrap();
        assert_eq!(subject.id.as_str(), "u-7");
        assert!(subject.roles().is_empty());
    }
}
