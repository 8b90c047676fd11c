//! The resolution contract for field business logic.
//!
//! A [`Resolver`] produces the value of one field. Resolvers may suspend
//! (database calls, remote services); the guard awaits them without
//! blocking other resolutions.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::context::ExecutionContext;

/// Failures of business logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The caller supplied unusable arguments.
    #[error("{0}")]
    InvalidInput(String),

    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ResolveError {
    /// Error code a transport reports for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidInput(_) => "BAD_USER_INPUT",
            ResolveError::NotFound(_) => "NOT_FOUND",
            ResolveError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Everything one field invocation receives.
#[derive(Debug, Clone, Copy)]
pub struct FieldCall<'a> {
    /// Name of the type owning the field.
    pub type_name: &'a str,
    /// Name of the field being resolved.
    pub field_name: &'a str,
    /// The parent object the field is read from.
    pub source: &'a Value,
    /// Arguments passed to the field (an object, or `null`).
    pub args: &'a Value,
    pub context: &'a ExecutionContext,
}

impl<'a> FieldCall<'a> {
    /// Returns a named argument, if present.
    pub fn arg(&self, name: &str) -> Option<&'a Value> {
        self.args.get(name)
    }

    /// Returns a named string argument, if present.
    pub fn str_arg(&self, name: &str) -> Option<&'a str> {
        self.arg(name).and_then(Value::as_str)
    }
}

/// Original resolution logic of a field.
#[async_trait]
pub trait Resolver: Send + Sync {
    async fn resolve(&self, call: FieldCall<'_>) -> Result<Value, ResolveError>;
}

/// Shared handle to a resolver.
pub type SharedResolver = Arc<dyn Resolver>;

/// Returns the parent object's property named like the field, or `null`.
///
/// Used for fields registered without explicit logic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyResolver;

#[async_trait]
impl Resolver for PropertyResolver {
    async fn resolve(&self, call: FieldCall<'_>) -> Result<Value, ResolveError> {
        Ok(call.source.get(call.field_name).cloned().unwrap_or(Value::Null))
    }
}

/// Adapter running a synchronous closure as a resolver.
pub struct FnResolver<F>(F);

impl<F> fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnResolver")
    }
}

#[async_trait]
impl<F> Resolver for FnResolver<F>
where
    F: Fn(FieldCall<'_>) -> Result<Value, ResolveError> + Send + Sync,
{
    async fn resolve(&self, call: FieldCall<'_>) -> Result<Value, ResolveError> {
        (self.0)(call)
    }
}

/// Wraps a synchronous closure as a shared resolver.
///
/// ```
/// use palisade_schema::resolver_fn;
/// use serde_json::json;
///
/// let health = resolver_fn(|_call| Ok(json!("OK")));
/// # let _ = health;
/// ```
pub fn resolver_fn<F>(f: F) -> SharedResolver
where
    F: Fn(FieldCall<'_>) -> Result<Value, ResolveError> + Send + Sync + 'static,
{
    Arc::new(FnResolver(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn property_resolver_reads_parent_property() {
        let context = ExecutionContext::anonymous();
        let source = json!({"id": "c-1", "name": "Ada"});
        let call = FieldCall {
            type_name: "Customer",
            field_name: "name",
            source: &source,
            args: &Value::Null,
            context: &context,
        };

        assert_eq!(PropertyResolver.resolve(call).await, Ok(json!("Ada")));
    }

    #[tokio::test]
    async fn property_resolver_defaults_to_null() {
        let context = ExecutionContext::anonymous();
        let source = json!({"id": "c-1"});
        let call = FieldCall {
            type_name: "Customer",
            field_name: "email",
            source: &source,
            args: &Value::Null,
            context: &context,
        };

        assert_eq!(PropertyResolver.resolve(call).await, Ok(Value::Null));
    }

    #[tokio::test]
    async fn fn_resolver_sees_arguments() {
        let echo = resolver_fn(|call| {
            call.str_arg("name")
                .map(|name| json!(name))
                .ok_or_else(|| ResolveError::InvalidInput("name is required".to_string()))
        });

        let context = ExecutionContext::anonymous();
        let args = json!({"name": "Grace"});
        let call = FieldCall {
            type_name: "Mutation",
            field_name: "echo",
            source: &Value::Null,
            args: &args,
            context: &context,
        };
        assert_eq!(echo.resolve(call).await, Ok(json!("Grace")));

        let missing = FieldCall {
            args: &Value::Null,
            ..call
        };
        let err = echo.resolve(missing).await.unwrap_err();
        assert_eq!(err.code(), "BAD_USER_INPUT");
    }
}
