//! Operation Handlers
//!
//! One handler per [`Operation`]: map validated arguments onto provider
//! request parameters, send the request, and keep only the response fields
//! relevant to the agent.

use serde_json::{Value, json};

use crate::catalogue::Operation;
use crate::configuration::Context;
use crate::error::{Result, ToolkitError};
use crate::provider::{ProviderClient, ProviderRequest};
use crate::schema::Arguments;

/// Default due date for invoices sent for manual payment
const DEFAULT_DAYS_UNTIL_DUE: i64 = 30;

/// Run one operation against the provider
pub(crate) async fn execute(
    operation: Operation,
    provider: &dyn ProviderClient,
    context: &Context,
    args: &Arguments,
) -> Result<Value> {
    let call = |request: ProviderRequest| provider.send(request.scoped(context));

    match operation {
        Operation::CreateCustomer => {
            let customer = call(
                ProviderRequest::post("/customers")
                    .param("name", args.required_str("name")?)
                    .param_opt("email", args.str("email")),
            )
            .await?;
            Ok(pick(&customer, &["id"]))
        }

        Operation::ListCustomers => {
            let customers = call(
                ProviderRequest::get("/customers")
                    .param_opt("email", args.str("email"))
                    .param_opt("limit", args.int("limit")),
            )
            .await?;
            Ok(Value::Array(data(&customers).iter().map(|c| pick(c, &["id"])).collect()))
        }

        Operation::CreateProduct => call(
            ProviderRequest::post("/products")
                .param("name", args.required_str("name")?)
                .param_opt("description", args.str("description")),
        )
        .await,

        Operation::ListProducts => {
            let products = call(ProviderRequest::get("/products").param_opt("limit", args.int("limit"))).await?;
            Ok(Value::Array(data(&products).to_vec()))
        }

        Operation::CreatePrice => call(
            ProviderRequest::post("/prices")
                .param("product", args.required_str("product")?)
                .param("currency", args.required_str("currency")?)
                .param("unit_amount", args.required_int("unit_amount")?),
        )
        .await,

        Operation::ListPrices => {
            let prices = call(
                ProviderRequest::get("/prices")
                    .param_opt("product", args.str("product"))
                    .param_opt("limit", args.int("limit")),
            )
            .await?;
            Ok(Value::Array(data(&prices).to_vec()))
        }

        Operation::CreatePaymentLink => {
            let mut request = ProviderRequest::post("/payment_links").param(
                "line_items",
                json!([{
                    "price": args.required_str("price")?,
                    "quantity": args.required_int("quantity")?,
                }]),
            );
            if let Some(url) = args.str("redirect_url") {
                request = request.param(
                    "after_completion",
                    json!({"type": "redirect", "redirect": {"url": url}}),
                );
            }
            let link = call(request).await?;
            Ok(pick(&link, &["id", "url"]))
        }

        Operation::ListInvoices => {
            let invoices = call(
                ProviderRequest::get("/invoices")
                    .param_opt("customer", args.str("customer"))
                    .param_opt("limit", args.int("limit")),
            )
            .await?;
            Ok(Value::Array(data(&invoices).to_vec()))
        }

        Operation::CreateInvoice => {
            let invoice = call(
                ProviderRequest::post("/invoices")
                    .param("customer", args.required_str("customer")?)
                    .param("collection_method", "send_invoice")
                    .param(
                        "days_until_due",
                        args.int("days_until_due").unwrap_or(DEFAULT_DAYS_UNTIL_DUE),
                    ),
            )
            .await?;
            Ok(pick(&invoice, &["id", "hosted_invoice_url", "customer", "status"]))
        }

        Operation::CreateInvoiceItem => {
            let item = call(
                ProviderRequest::post("/invoiceitems")
                    .param("customer", args.required_str("customer")?)
                    .param("price", args.required_str("price")?)
                    .param("invoice", args.required_str("invoice")?),
            )
            .await?;
            Ok(pick(&item, &["id", "invoice"]))
        }

        Operation::FinalizeInvoice => {
            let invoice_id = path_segment("invoice", args.required_str("invoice")?)?;
            let invoice = call(ProviderRequest::post(format!("/invoices/{invoice_id}/finalize"))).await?;
            Ok(pick(&invoice, &["id", "hosted_invoice_url", "customer", "status"]))
        }

        Operation::RetrieveBalance => call(ProviderRequest::get("/balance")).await,

        Operation::CreateRefund => call(
            ProviderRequest::post("/refunds")
                .param("payment_intent", args.required_str("payment_intent")?)
                .param_opt("amount", args.int("amount")),
        )
        .await,

        Operation::ListPaymentIntents => {
            let intents = call(
                ProviderRequest::get("/payment_intents")
                    .param_opt("customer", args.str("customer"))
                    .param_opt("limit", args.int("limit")),
            )
            .await?;
            Ok(Value::Array(data(&intents).to_vec()))
        }

        Operation::CreateBillingPortalSession => {
            let session = call(
                ProviderRequest::post("/billing_portal/sessions")
                    .param("customer", args.required_str("customer")?)
                    .param_opt("return_url", args.str("return_url")),
            )
            .await?;
            Ok(pick(&session, &["id", "customer", "url"]))
        }

        Operation::CreateMeterEvent => {
            let event = crate::metering::MeterEvent::new(
                args.required_str("event_name")?,
                args.required_str("customer")?,
                args.str("value").map(str::to_string),
            );
            let recorded = call(event.to_request()).await?;
            Ok(pick(&recorded, &["event_name", "identifier", "timestamp"]))
        }
    }
}

/// An object id interpolated into a request path: letters, digits and `_` only
fn path_segment<'a>(field: &str, id: &'a str) -> Result<&'a str> {
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        Ok(id)
    } else {
        Err(ToolkitError::Validation(format!(
            "field '{field}' must be an object id (got '{id}')"
        )))
    }
}

/// The `data` array of a list response (empty when absent)
fn data(list: &Value) -> &[Value] {
    list.get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Copy only `keys` out of a provider object; missing keys become `null`
fn pick(object: &Value, keys: &[&str]) -> Value {
    let picked = keys
        .iter()
        .map(|key| ((*key).to_string(), object.get(*key).cloned().unwrap_or(Value::Null)))
        .collect();
    Value::Object(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Method, MockProviderClient};
    use serde_json::Map;

    fn arguments(operation: Operation, value: Value) -> Arguments {
        let raw: Map<String, Value> = value.as_object().cloned().unwrap();
        operation.schema().validate(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_create_customer_returns_only_id() {
        let mock = MockProviderClient::new();
        let args = arguments(Operation::CreateCustomer, json!({"name": "Ada", "email": "ada@example.com"}));

        let result = execute(Operation::CreateCustomer, &mock, &Context::default(), &args)
            .await
            .unwrap();

        assert_eq!(result, json!({"id": "cus_000001"}));
        let request = &mock.requests()[0];
        assert_eq!(request.params.get("email"), Some(&json!("ada@example.com")));
        assert!(request.account.is_none());
    }

    #[tokio::test]
    async fn test_context_account_scopes_every_call() {
        let mock = MockProviderClient::new().with_object(json!({
            "id": "pi_1", "object": "payment_intent", "amount": 1000
        }));
        let context = Context::for_account("acct_123");

        let args = arguments(Operation::CreateRefund, json!({"payment_intent": "pi_1"}));
        execute(Operation::CreateRefund, &mock, &context, &args).await.unwrap();
        execute(Operation::RetrieveBalance, &mock, &context, &Arguments::default())
            .await
            .unwrap();

        for request in mock.requests() {
            assert_eq!(request.account.as_deref(), Some("acct_123"));
        }
    }

    #[tokio::test]
    async fn test_create_invoice_defaults() {
        let mock = MockProviderClient::new().with_object(json!({"id": "cus_9", "object": "customer"}));
        let args = arguments(Operation::CreateInvoice, json!({"customer": "cus_9"}));

        let result = execute(Operation::CreateInvoice, &mock, &Context::default(), &args)
            .await
            .unwrap();

        assert_eq!(result["status"], "draft");
        assert_eq!(result["customer"], "cus_9");
        let request = &mock.requests()[0];
        assert_eq!(request.params.get("collection_method"), Some(&json!("send_invoice")));
        assert_eq!(request.params.get("days_until_due"), Some(&json!(30)));
    }

    #[tokio::test]
    async fn test_payment_link_with_redirect() {
        let mock = MockProviderClient::new().with_object(json!({"id": "price_1", "object": "price"}));
        let args = arguments(
            Operation::CreatePaymentLink,
            json!({"price": "price_1", "quantity": 2, "redirect_url": "https://example.com/thanks"}),
        );

        let result = execute(Operation::CreatePaymentLink, &mock, &Context::default(), &args)
            .await
            .unwrap();

        assert!(result["url"].as_str().unwrap().starts_with("https://buy.stripe.com/"));
        let request = &mock.requests()[0];
        assert_eq!(request.params["line_items"], json!([{"price": "price_1", "quantity": 2}]));
        assert_eq!(
            request.params["after_completion"]["redirect"]["url"],
            "https://example.com/thanks"
        );
    }

    #[tokio::test]
    async fn test_finalize_invoice_path() {
        let mock = MockProviderClient::new().with_object(json!({
            "id": "in_1", "object": "invoice", "customer": "cus_1", "status": "draft"
        }));
        let args = arguments(Operation::FinalizeInvoice, json!({"invoice": "in_1"}));

        let result = execute(Operation::FinalizeInvoice, &mock, &Context::default(), &args)
            .await
            .unwrap();

        assert_eq!(result["status"], "open");
        let request = &mock.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path, "/invoices/in_1/finalize");
    }

    #[tokio::test]
    async fn test_finalize_invoice_rejects_path_characters() {
        let mock = MockProviderClient::new().with_object(json!({"id": "qt_1", "object": "quote"}));

        for invoice in ["x/../../quotes/qt_1", "in_1?expand=customer", "in 1"] {
            let args = arguments(Operation::FinalizeInvoice, json!({"invoice": invoice}));
            let err = execute(Operation::FinalizeInvoice, &mock, &Context::default(), &args)
                .await
                .unwrap_err();
            assert!(matches!(err, ToolkitError::Validation(ref msg) if msg.contains("'invoice'")));
        }
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_list_products_returns_data_array() {
        let mock = MockProviderClient::new()
            .with_object(json!({"id": "prod_a", "object": "product", "name": "A"}))
            .with_object(json!({"id": "prod_b", "object": "product", "name": "B"}));
        let args = arguments(Operation::ListProducts, json!({"limit": 1}));

        let result = execute(Operation::ListProducts, &mock, &Context::default(), &args)
            .await
            .unwrap();

        assert_eq!(result.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_pick_fills_missing_with_null() {
        let picked = pick(&json!({"id": "x", "extra": 1}), &["id", "url"]);
        assert_eq!(picked, json!({"id": "x", "url": null}));
    }
}
