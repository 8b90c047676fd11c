//! End-to-end authorization of a small customer portal schema.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use palisade_guard::{AuthorizedSchema, FieldError, FieldRequest, GuardKind, GuardOptions};
use palisade_rbac::{DecisionEngine, RoleRegistry};
use palisade_schema::{
    ExecutionContext, FieldCall, FieldDescriptor, ResolveError, Resolver, SchemaGraph,
    TypeDescriptor, resolver_fn,
};
use palisade_types::Principal;
use proptest::prelude::*;
use serde_json::{Value, json};
use test_case::test_case;

/// Looks up a customer's invoices after a simulated storage round trip.
struct SlowInvoices {
    delay: Duration,
}

#[async_trait]
impl Resolver for SlowInvoices {
    async fn resolve(&self, call: FieldCall<'_>) -> Result<Value, ResolveError> {
        tokio::time::sleep(self.delay).await;
        let customer_id = call
            .source
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| ResolveError::Internal("customer without id".to_string()))?;
        Ok(json!([{ "id": format!("inv-{customer_id}"), "customerId": customer_id }]))
    }
}

// ============================================================================
// Fixture
// ============================================================================

fn users() -> Value {
    json!([
        { "id": "c-1", "type": "customer", "name": "Ada", "username": "ada", "email": "ada@example.com" },
        { "id": "c-2", "type": "customer", "name": "Grace", "username": "grace", "email": "grace@example.com" },
        { "id": "e-1", "type": "employee", "name": "Alan", "username": "alan" },
    ])
}

fn customers() -> Vec<Value> {
    users()
        .as_array()
        .map(|all| {
            all.iter()
                .filter(|u| u["type"] == "customer")
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn graph(invoice_delay: Duration) -> SchemaGraph {
    SchemaGraph::new()
        .with_type(
            TypeDescriptor::new("Query")
                .with_field(
                    FieldDescriptor::new("health")
                        .with_auth(["self:anyone"])
                        .resolved_by(resolver_fn(|_| Ok(json!("OK")))),
                )
                .with_field(
                    FieldDescriptor::new("me")
                        .with_auth(["self:customer"])
                        .resolved_by(resolver_fn(|call| {
                            let id = call.context.principal().map(|p| p.id.as_str());
                            Ok(customers()
                                .into_iter()
                                .find(|c| c["id"].as_str() == id)
                                .unwrap_or(Value::Null))
                        })),
                )
                .with_field(
                    FieldDescriptor::new("customers")
                        .with_auth(["customer:read"])
                        .resolved_by(resolver_fn(|_| Ok(Value::Array(customers())))),
                )
                .with_field(FieldDescriptor::new("legacyReport"))
                .with_field(
                    FieldDescriptor::new("__typename")
                        .resolved_by(resolver_fn(|_| Ok(json!("Query")))),
                ),
        )
        .with_type(
            TypeDescriptor::new("Mutation").with_field(
                FieldDescriptor::new("updateCustomer")
                    .with_auth(["customer:write"])
                    .resolved_by(resolver_fn(|call| {
                        let id = call.str_arg("customerId");
                        let name = call.str_arg("name");
                        let mut customer = customers()
                            .into_iter()
                            .find(|c| c["id"].as_str() == id)
                            .ok_or_else(|| ResolveError::InvalidInput("User not found".into()))?;
                        if let Some(name) = name {
                            customer["name"] = json!(name);
                        }
                        Ok(customer)
                    })),
            ),
        )
        .with_type(
            TypeDescriptor::new("Customer")
                .with_auth(["self:customer", "customer:read"])
                .with_field(FieldDescriptor::new("id"))
                .with_field(FieldDescriptor::new("name"))
                .with_field(FieldDescriptor::new("email"))
                .with_field(
                    FieldDescriptor::new("invoices")
                        .with_auth(["invoice:read"])
                        .with_resolver(SlowInvoices {
                            delay: invoice_delay,
                        }),
                ),
        )
        .with_type(
            TypeDescriptor::new("__Schema")
                .with_field(FieldDescriptor::new("types"))
                .with_field(FieldDescriptor::new("description").with_auth(["iam:write"])),
        )
}

fn portal_with_delay(delay: Duration) -> AuthorizedSchema {
    AuthorizedSchema::build(
        graph(delay),
        DecisionEngine::new(Arc::new(RoleRegistry::standard())),
        GuardOptions::default().without_audit(),
    )
    .unwrap()
}

fn portal() -> AuthorizedSchema {
    portal_with_delay(Duration::from_millis(5))
}

fn as_role(role: &str) -> ExecutionContext {
    ExecutionContext::for_principal(Principal::new("c-1").with_role(role))
}

fn ada() -> Value {
    customers().into_iter().next().unwrap_or(Value::Null)
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn employee_reads_customers() {
    let value = portal()
        .resolve_field("Query", "customers", &Value::Null, &Value::Null, &as_role("employee"))
        .await
        .unwrap();

    assert_eq!(value.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn customer_cannot_read_customers() {
    let err = portal()
        .resolve_field("Query", "customers", &Value::Null, &Value::Null, &as_role("customer"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Unauthorized: Query.customers");
    assert_eq!(err.code(), "FORBIDDEN");
}

#[tokio::test]
async fn anonymous_cannot_read_type_guarded_field() {
    let err = portal()
        .resolve_field("Customer", "email", &ada(), &Value::Null, &ExecutionContext::anonymous())
        .await
        .unwrap_err();

    assert!(matches!(err, FieldError::AccessDenied { .. }));
}

#[test_case(None; "anonymous")]
#[test_case(Some(&["customer"][..]); "customer")]
#[test_case(Some(&["employee", "roles-editor", "invoice-manager", "customer"][..]); "every role")]
fn undeclared_field_is_denied_for_everyone(roles: Option<&[&str]>) {
    let context = ExecutionContext::new(roles.map(|roles| {
        roles
            .iter()
            .fold(Principal::new("p-1"), |p, role| p.with_role(*role))
    }));

    let result = futures::executor::block_on(portal().resolve_field(
        "Query",
        "legacyReport",
        &json!({"legacyReport": "secret"}),
        &Value::Null,
        &context,
    ));

    assert_eq!(
        result,
        Err(FieldError::Configuration {
            type_name: "Query".to_string(),
            field_name: "legacyReport".to_string(),
        })
    );
}

#[tokio::test]
async fn public_fields_need_no_role() {
    let schema = portal();
    let anonymous = ExecutionContext::anonymous();

    let health = schema
        .resolve_field("Query", "health", &Value::Null, &Value::Null, &anonymous)
        .await;
    let typename = schema
        .resolve_field("Query", "__typename", &Value::Null, &Value::Null, &anonymous)
        .await;

    assert_eq!(health, Ok(json!("OK")));
    assert_eq!(typename, Ok(json!("Query")));
}

#[tokio::test]
async fn unknown_role_behaves_like_anonymous() {
    let schema = portal();
    let context = as_role("superuser");

    let me = schema
        .resolve_field("Query", "me", &Value::Null, &Value::Null, &context)
        .await;
    let health = schema
        .resolve_field("Query", "health", &Value::Null, &Value::Null, &context)
        .await;

    assert!(matches!(me, Err(FieldError::AccessDenied { .. })));
    assert_eq!(health, Ok(json!("OK")));
}

#[tokio::test]
async fn customer_reads_own_profile() {
    let value = portal()
        .resolve_field("Query", "me", &Value::Null, &Value::Null, &as_role("customer"))
        .await
        .unwrap();

    assert_eq!(value["name"], "Ada");
}

#[tokio::test]
async fn field_requirement_overrides_type_requirement() {
    let schema = portal();

    // Satisfies the Customer type requirement but not invoices' own.
    let customer = schema
        .resolve_field("Customer", "invoices", &ada(), &Value::Null, &as_role("customer"))
        .await;
    assert!(matches!(customer, Err(FieldError::AccessDenied { .. })));

    // Holds invoice:read without satisfying the type requirement.
    let manager = schema
        .resolve_field("Customer", "invoices", &ada(), &Value::Null, &as_role("invoice-manager"))
        .await
        .unwrap();
    assert_eq!(manager[0]["customerId"], "c-1");
}

#[tokio::test]
async fn mutation_input_errors_pass_through() {
    let schema = portal();
    let employee = as_role("employee");

    let updated = schema
        .resolve_field(
            "Mutation",
            "updateCustomer",
            &Value::Null,
            &json!({"customerId": "c-2", "name": "Grace H."}),
            &employee,
        )
        .await
        .unwrap();
    assert_eq!(updated["name"], "Grace H.");

    let missing = schema
        .resolve_field(
            "Mutation",
            "updateCustomer",
            &Value::Null,
            &json!({"customerId": "c-9", "name": "Nobody"}),
            &employee,
        )
        .await
        .unwrap_err();
    assert_eq!(missing.code(), "BAD_USER_INPUT");
    assert_eq!(missing.to_string(), "User not found");

    let readonly = schema
        .resolve_field(
            "Mutation",
            "updateCustomer",
            &Value::Null,
            &json!({"customerId": "c-2", "name": "Grace H."}),
            &as_role("employee-readonly"),
        )
        .await;
    assert!(matches!(readonly, Err(FieldError::AccessDenied { .. })));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn suspending_resolver_value_is_returned_unchanged() {
    let value = portal_with_delay(Duration::from_millis(20))
        .resolve_field("Customer", "invoices", &ada(), &Value::Null, &as_role("invoice-manager"))
        .await
        .unwrap();

    assert_eq!(value, json!([{ "id": "inv-c-1", "customerId": "c-1" }]));
}

#[tokio::test]
async fn denied_sibling_does_not_affect_others() {
    let schema = portal();
    let principal = Principal::new("c-1")
        .with_role("customer")
        .with_role("invoice-manager");
    let context = ExecutionContext::for_principal(principal);

    let results = schema
        .resolve_fields(
            "Query",
            &Value::Null,
            &[
                FieldRequest::new("customers"),
                FieldRequest::new("me"),
                FieldRequest::new("legacyReport"),
                FieldRequest::new("health"),
            ],
            &context,
        )
        .await;

    assert!(matches!(results[0], Err(FieldError::AccessDenied { .. })));
    assert_eq!(results[1].as_ref().map(|me| me["id"].clone()), Ok(json!("c-1")));
    assert!(matches!(results[2], Err(FieldError::Configuration { .. })));
    assert_eq!(results[3], Ok(json!("OK")));
}

#[tokio::test]
async fn shared_across_spawned_tasks() {
    let schema = Arc::new(portal());
    let roles = ["employee", "customer", "invoice-manager", "anonymous"];

    let handles: Vec<_> = roles
        .iter()
        .map(|role| {
            let schema = Arc::clone(&schema);
            let role = (*role).to_string();
            tokio::spawn(async move {
                let context = as_role(&role);
                schema
                    .resolve_field("Customer", "invoices", &ada(), &Value::Null, &context)
                    .await
                    .is_ok()
            })
        })
        .collect();

    let mut granted = Vec::new();
    for handle in handles {
        granted.push(handle.await.unwrap());
    }

    assert_eq!(granted, vec![false, false, true, false]);
}

#[tokio::test]
async fn cancelled_resolution_leaves_schema_usable() {
    let schema = portal_with_delay(Duration::from_millis(200));
    let manager = as_role("invoice-manager");

    let timed_out = tokio::time::timeout(
        Duration::from_millis(10),
        schema.resolve_field("Customer", "invoices", &ada(), &Value::Null, &manager),
    )
    .await;
    assert!(timed_out.is_err());

    let health = schema
        .resolve_field("Query", "health", &Value::Null, &Value::Null, &manager)
        .await;
    assert_eq!(health, Ok(json!("OK")));
}

#[tokio::test]
async fn reserved_type_fields_resolve_for_anyone() {
    let schema = portal();
    let source = json!({"types": ["Query", "Customer"], "description": "portal"});

    let results = schema
        .resolve_fields(
            "__Schema",
            &source,
            &[FieldRequest::new("types"), FieldRequest::new("description")],
            &ExecutionContext::anonymous(),
        )
        .await;

    assert_eq!(results, vec![Ok(json!(["Query", "Customer"])), Ok(json!("portal"))]);
}

#[test]
fn install_decisions() {
    let schema = portal();

    let kind = |t: &str, f: &str| schema.field(t, f).map(|field| field.kind());
    assert_eq!(kind("Query", "health"), Some(GuardKind::Guarded));
    assert_eq!(kind("Query", "legacyReport"), Some(GuardKind::AlwaysDenied));
    assert_eq!(kind("Query", "__typename"), Some(GuardKind::Passthrough));
    assert_eq!(kind("Customer", "email"), Some(GuardKind::Guarded));
    assert_eq!(kind("__Schema", "types"), Some(GuardKind::Passthrough));
    assert_eq!(kind("__Schema", "description"), Some(GuardKind::Passthrough));
    assert_eq!(schema.denied_by_default().count(), 1);
}

// ============================================================================
// Properties
// ============================================================================

fn role_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec![
            "anonymous",
            "customer",
            "employee",
            "employee-readonly",
            "roles-editor",
            "invoice-manager",
            "profile-service",
            "no-such-role",
        ])
        .prop_map(str::to_string),
        0..4,
    )
}

proptest! {
    #[test]
    fn reserved_fields_always_resolve(roles in role_strategy()) {
        let schema = portal();
        let context = ExecutionContext::for_principal(
            roles.iter().fold(Principal::new("p"), |p, r| p.with_role(r.as_str())),
        );

        let value = futures::executor::block_on(
            schema.resolve_field("Query", "__typename", &Value::Null, &Value::Null, &context),
        );
        prop_assert_eq!(value, Ok(json!("Query")));
    }

    #[test]
    fn customers_granted_iff_customer_read(roles in role_strategy()) {
        let schema = portal();
        let context = ExecutionContext::for_principal(
            roles.iter().fold(Principal::new("p"), |p, r| p.with_role(r.as_str())),
        );
        let expected = roles
            .iter()
            .any(|r| matches!(r.as_str(), "employee" | "employee-readonly" | "profile-service"));

        let result = futures::executor::block_on(
            schema.resolve_field("Query", "customers", &Value::Null, &Value::Null, &context),
        );
        prop_assert_eq!(result.is_ok(), expected);
    }
}
