//! Mock Provider Client
//!
//! In-memory stand-in for the payment provider, for tests, demos and offline
//! runs. Objects live in process memory; lookups of unknown ids fail the same
//! way the real API does.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use super::{Method, ProviderClient, ProviderRequest};
use crate::error::{Result, ToolkitError};

#[derive(Default)]
struct MockState {
    objects: BTreeMap<String, Value>,
    requests: Vec<ProviderRequest>,
    next_id: u64,
}

/// Mock provider with an in-memory object store
#[derive(Default)]
pub struct MockProviderClient {
    state: Mutex<MockState>,

    /// Injected failures keyed by request path
    failures: HashMap<String, String>,
}

impl MockProviderClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing object (must carry an `id`)
    #[must_use]
    pub fn with_object(self, object: Value) -> Self {
        if let Some(id) = object.get("id").and_then(Value::as_str) {
            if let Ok(mut state) = self.state.lock() {
                state.objects.insert(id.to_string(), object.clone());
            }
        }
        self
    }

    /// Make every request to `path` fail with `message`
    #[must_use]
    pub fn fail_path(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(path.into(), message.into());
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    /// Look up a stored object by id
    pub fn object(&self, id: &str) -> Option<Value> {
        self.state.lock().ok()?.objects.get(id).cloned()
    }

    fn state(&self) -> Result<MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| ToolkitError::Provider("mock provider state poisoned".into()))
    }

    fn route(&self, request: &ProviderRequest) -> Result<Value> {
        let mut state = self.state()?;
        state.requests.push(request.clone());

        if let Some(message) = self.failures.get(&request.path) {
            return Err(ToolkitError::Provider(message.clone()));
        }

        let params = &request.params;

        match (request.method, request.path.as_str()) {
            (Method::Post, "/customers") => Ok(state.create("cus", "customer", params.clone())),
            (Method::Get, "/customers") => Ok(state.list("customer", params)),

            (Method::Post, "/products") => Ok(state.create("prod", "product", params.clone())),
            (Method::Get, "/products") => Ok(state.list("product", params)),

            (Method::Post, "/prices") => {
                state.require(str_param(params, "product"), "product")?;
                Ok(state.create("price", "price", params.clone()))
            }
            (Method::Get, "/prices") => Ok(state.list("price", params)),

            (Method::Post, "/payment_links") => {
                let price = params
                    .get("line_items")
                    .and_then(|items| items.get(0))
                    .and_then(|item| item.get("price"))
                    .and_then(Value::as_str);
                state.require(price, "price")?;

                let mut link = state.create("plink", "payment_link", params.clone());
                let url = format!("https://buy.stripe.com/test_{}", link["id"].as_str().unwrap_or_default());
                link["url"] = json!(url);
                state.store(&link);
                Ok(link)
            }

            (Method::Get, "/invoices") => Ok(state.list("invoice", params)),
            (Method::Post, "/invoices") => {
                state.require(str_param(params, "customer"), "customer")?;
                let mut fields = params.clone();
                fields.insert("status".into(), json!("draft"));
                fields.insert("hosted_invoice_url".into(), Value::Null);
                Ok(state.create("in", "invoice", fields))
            }
            (Method::Post, "/invoiceitems") => {
                state.require(str_param(params, "customer"), "customer")?;
                state.require(str_param(params, "price"), "price")?;
                state.require(str_param(params, "invoice"), "invoice")?;
                Ok(state.create("ii", "invoiceitem", params.clone()))
            }
            (Method::Post, path) if finalize_target(path).is_some() => {
                let id = finalize_target(path).unwrap_or_default();
                let mut invoice = state.require(Some(id), "invoice")?;
                invoice["status"] = json!("open");
                invoice["hosted_invoice_url"] = json!(format!("https://invoice.stripe.com/i/{id}"));
                state.store(&invoice);
                Ok(invoice)
            }

            (Method::Get, "/balance") => Ok(json!({
                "object": "balance",
                "available": [{"amount": 0, "currency": "usd"}],
                "pending": [{"amount": 0, "currency": "usd"}],
                "livemode": false,
            })),

            (Method::Post, "/refunds") => {
                let intent = state.require(str_param(params, "payment_intent"), "payment_intent")?;
                let charged = intent.get("amount").and_then(Value::as_i64).unwrap_or(0);
                let amount = params.get("amount").and_then(Value::as_i64).unwrap_or(charged);
                if amount > charged {
                    return Err(ToolkitError::Provider(format!(
                        "Refund amount ({amount}) is greater than unrefunded amount on charge ({charged})"
                    )));
                }
                let mut fields = params.clone();
                fields.insert("amount".into(), json!(amount));
                fields.insert("status".into(), json!("succeeded"));
                Ok(state.create("re", "refund", fields))
            }

            (Method::Get, "/payment_intents") => Ok(state.list("payment_intent", params)),

            (Method::Post, "/billing_portal/sessions") => {
                state.require(str_param(params, "customer"), "customer")?;
                let mut session = state.create("bps", "billing_portal.session", params.clone());
                let url = format!(
                    "https://billing.stripe.com/p/session/test_{}",
                    session["id"].as_str().unwrap_or_default()
                );
                session["url"] = json!(url);
                state.store(&session);
                Ok(session)
            }

            (Method::Post, "/billing/meter_events") => {
                let mut event = params.clone();
                event.insert("object".into(), json!("billing.meter_event"));
                event.insert("livemode".into(), json!(false));
                Ok(Value::Object(event))
            }

            (method, path) => Err(ToolkitError::Provider(format!(
                "Unrecognized request URL ({}: /v1{path})",
                if method == Method::Get { "GET" } else { "POST" }
            ))),
        }
    }
}

/// Invoice id of a `/invoices/{id}/finalize` path
fn finalize_target(path: &str) -> Option<&str> {
    path.strip_prefix("/invoices/")
        .and_then(|rest| rest.strip_suffix("/finalize"))
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

fn str_param<'a>(params: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

impl MockState {
    fn create(&mut self, prefix: &str, object_type: &str, mut fields: Map<String, Value>) -> Value {
        self.next_id += 1;
        let id = format!("{prefix}_{:06}", self.next_id);

        fields.insert("id".into(), json!(id));
        fields.insert("object".into(), json!(object_type));
        fields.insert("livemode".into(), json!(false));

        let object = Value::Object(fields);
        self.objects.insert(id, object.clone());
        object
    }

    fn store(&mut self, object: &Value) {
        if let Some(id) = object.get("id").and_then(Value::as_str) {
            self.objects.insert(id.to_string(), object.clone());
        }
    }

    fn require(&self, id: Option<&str>, kind: &str) -> Result<Value> {
        let id = id.unwrap_or_default();
        self.objects
            .get(id)
            .filter(|object| object.get("object").and_then(Value::as_str) == Some(kind))
            .cloned()
            .ok_or_else(|| ToolkitError::Provider(format!("No such {kind}: '{id}'")))
    }

    /// List objects of one type; every param other than `limit` is an
    /// equality filter on the object's field of the same name
    fn list(&self, object_type: &str, params: &Map<String, Value>) -> Value {
        let limit = params
            .get("limit")
            .and_then(Value::as_u64)
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(10);

        let data: Vec<Value> = self
            .objects
            .values()
            .filter(|object| object.get("object").and_then(Value::as_str) == Some(object_type))
            .filter(|object| {
                params
                    .iter()
                    .filter(|(key, _)| key.as_str() != "limit")
                    .all(|(key, value)| object.get(key) == Some(value))
            })
            .take(limit)
            .cloned()
            .collect();

        json!({
            "object": "list",
            "data": data,
            "has_more": false,
        })
    }
}

#[async_trait]
impl ProviderClient for MockProviderClient {
    async fn send(&self, request: ProviderRequest) -> Result<Value> {
        self.route(&request)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list() {
        let mock = MockProviderClient::new();
        let created = mock
            .send(ProviderRequest::post("/customers").param("name", "Ada").param("email", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(created["id"], "cus_000001");
        assert_eq!(created["object"], "customer");

        let listed = mock
            .send(ProviderRequest::get("/customers").param("email", "ada@example.com"))
            .await
            .unwrap();
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);

        let none = mock
            .send(ProviderRequest::get("/customers").param("email", "bob@example.com"))
            .await
            .unwrap();
        assert!(none["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_fails_like_the_api() {
        let mock = MockProviderClient::new();
        let err = mock
            .send(ProviderRequest::post("/refunds").param("payment_intent", "pi_missing"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Provider error: No such payment_intent: 'pi_missing'");
    }

    #[tokio::test]
    async fn test_injected_failure_and_request_log() {
        let mock = MockProviderClient::new().fail_path("/balance", "rate limited");
        let err = mock.send(ProviderRequest::get("/balance")).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognized_path() {
        let mock = MockProviderClient::new();
        let err = mock.send(ProviderRequest::get("/subscriptions")).await.unwrap_err();
        assert!(err.to_string().contains("GET: /v1/subscriptions"));
    }

    #[tokio::test]
    async fn test_malformed_finalize_paths() {
        let mock = MockProviderClient::new();

        let err = mock.send(ProviderRequest::post("/invoices/finalize")).await.unwrap_err();
        assert!(err.to_string().contains("POST: /v1/invoices/finalize"));

        let err = mock.send(ProviderRequest::post("/invoices//finalize")).await.unwrap_err();
        assert!(err.to_string().contains("Unrecognized request URL"));

        let err = mock.send(ProviderRequest::post("/invoices/in_404/finalize")).await.unwrap_err();
        assert_eq!(err.to_string(), "Provider error: No such invoice: 'in_404'");
    }
}
