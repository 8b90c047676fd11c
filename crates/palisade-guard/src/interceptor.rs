//! Field interceptor.
//!
//! Every field is classified once, at install time:
//!
//! ```text
//! reserved field or type name        -> Passthrough   (original logic, no check)
//! field or type declares permissions -> Guarded       (check, then original logic)
//! nothing declared                   -> AlwaysDenied  (configuration error)
//! ```
//!
//! Once installed the state never changes. A guarded field awaits the
//! original logic, so suspension and cancellation behave exactly as they do
//! for the unwrapped resolver.

use std::fmt;

use palisade_rbac::DecisionEngine;
use palisade_schema::{
    ExecutionContext, FieldCall, FieldDescriptor, SchemaError, SharedResolver, requirement_of,
};
use palisade_types::Requirement;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FieldError, Result};
use crate::options::GuardOptions;

/// Install-time classification of a field, without its resolution logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardKind {
    AlwaysDenied,
    Guarded,
    Passthrough,
}

impl fmt::Display for GuardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardKind::AlwaysDenied => f.write_str("denied-by-default"),
            GuardKind::Guarded => f.write_str("guarded"),
            GuardKind::Passthrough => f.write_str("passthrough"),
        }
    }
}

/// The wrapped form of one field.
#[derive(Clone)]
pub enum FieldGuard {
    /// Original logic discarded; every call is a configuration error.
    AlwaysDenied,
    /// Checked against `field`, falling back to `owner` when `field` is empty.
    Guarded {
        field: Requirement,
        owner: Requirement,
        resolver: SharedResolver,
    },
    /// Reserved name; original logic runs unchecked.
    Passthrough { resolver: SharedResolver },
}

impl FieldGuard {
    pub fn kind(&self) -> GuardKind {
        match self {
            FieldGuard::AlwaysDenied => GuardKind::AlwaysDenied,
            FieldGuard::Guarded { .. } => GuardKind::Guarded,
            FieldGuard::Passthrough { .. } => GuardKind::Passthrough,
        }
    }
}

impl fmt::Debug for FieldGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldGuard::AlwaysDenied => f.write_str("AlwaysDenied"),
            FieldGuard::Guarded { field, owner, .. } => f
                .debug_struct("Guarded")
                .field("field", field)
                .field("owner", owner)
                .finish_non_exhaustive(),
            FieldGuard::Passthrough { .. } => f.write_str("Passthrough"),
        }
    }
}

/// A field after installation.
#[derive(Debug, Clone)]
pub struct GuardedField {
    pub type_name: String,
    pub field_name: String,
    pub guard: FieldGuard,
}

/// Wraps one field according to its declared requirements.
///
/// `owner` is the owning type's requirement as recorded in the permission
/// index.
///
/// # Errors
///
/// Returns [`SchemaError::MalformedAnnotation`] if the field's annotation
/// holds a malformed permission token.
pub fn install(
    field: FieldDescriptor,
    owner: &Requirement,
    options: &GuardOptions,
) -> std::result::Result<GuardedField, SchemaError> {
    let path = field.path();
    let declared = requirement_of(field.auth.as_ref(), &path)?;

    let guard = if options.is_exempt(&field.owner, &field.name) {
        if !declared.is_empty() || !owner.is_empty() {
            warn!(
                type_name = %field.owner,
                field_name = %field.name,
                "Auth annotation on reserved field ignored"
            );
        }
        FieldGuard::Passthrough {
            resolver: field.resolver,
        }
    } else if declared.is_empty() && owner.is_empty() {
        warn!(
            type_name = %field.owner,
            field_name = %field.name,
            "No access control specified, field denied by default"
        );
        FieldGuard::AlwaysDenied
    } else {
        FieldGuard::Guarded {
            field: declared,
            owner: owner.clone(),
            resolver: field.resolver,
        }
    };

    Ok(GuardedField {
        type_name: field.owner,
        field_name: field.name,
        guard,
    })
}

impl GuardedField {
    pub fn kind(&self) -> GuardKind {
        self.guard.kind()
    }

    /// The requirement the decision engine evaluates for this field, if any.
    pub fn effective_requirement(&self) -> Option<&Requirement> {
        match &self.guard {
            FieldGuard::Guarded { field, .. } if !field.is_empty() => Some(field),
            FieldGuard::Guarded { owner, .. } => Some(owner),
            FieldGuard::AlwaysDenied | FieldGuard::Passthrough { .. } => None,
        }
    }

    /// Resolves the field for the principal carried by `context`.
    ///
    /// # Errors
    ///
    /// [`FieldError::Configuration`] for a field denied by default,
    /// [`FieldError::AccessDenied`] when the principal lacks every required
    /// permission, and [`FieldError::Resolver`] when the original logic fails.
    pub async fn resolve(
        &self,
        engine: &DecisionEngine,
        options: &GuardOptions,
        source: &Value,
        args: &Value,
        context: &ExecutionContext,
    ) -> Result<Value> {
        let resolver = match &self.guard {
            FieldGuard::AlwaysDenied => {
                if options.audit {
                    warn!(
                        type_name = %self.type_name,
                        field_name = %self.field_name,
                        principal = ?context.principal().map(|p| p.id.as_str()),
                        "Field without access control invoked"
                    );
                }
                return Err(FieldError::Configuration {
                    type_name: self.type_name.clone(),
                    field_name: self.field_name.clone(),
                });
            }
            FieldGuard::Guarded {
                field,
                owner,
                resolver,
            } => {
                let decision = engine.decide_with(field, owner, &context.permissions(engine));

                if options.audit {
                    let principal = context.principal().map(|p| p.id.as_str());
                    if decision.granted {
                        debug!(
                            type_name = %self.type_name,
                            field_name = %self.field_name,
                            principal = ?principal,
                            reason = %decision.reason,
                            "Field access granted"
                        );
                    } else {
                        warn!(
                            type_name = %self.type_name,
                            field_name = %self.field_name,
                            principal = ?principal,
                            reason = %decision.reason,
                            "Field access denied"
                        );
                    }
                }

                if !decision.granted {
                    return Err(FieldError::AccessDenied {
                        type_name: self.type_name.clone(),
                        field_name: self.field_name.clone(),
                    });
                }
                resolver
            }
            FieldGuard::Passthrough { resolver } => resolver,
        };

        let call = FieldCall {
            type_name: &self.type_name,
            field_name: &self.field_name,
            source,
            args,
            context,
        };
        Ok(resolver.resolve(call).await?)
    }
}
