//! Toolkit Facade

use std::sync::Arc;

use serde_json::Value;
use toolkit_core::{BillingHooks, BillingMode, Catalogue, Configuration, Dispatcher, ProviderClient};

use crate::adapter::{self, FrameworkTool};
use crate::frameworks::Framework;

/// Filtered catalogue plus the dispatcher that serves it
///
/// Built once per configuration; hands out tool sets for any framework.
pub struct Toolkit {
    catalogue: Catalogue,
    dispatcher: Arc<Dispatcher>,
}

impl Toolkit {
    pub fn new(provider: Arc<dyn ProviderClient>, configuration: &Configuration) -> Self {
        let catalogue = Catalogue::standard().filter(configuration);
        let context = configuration.context();

        if catalogue.is_empty() {
            tracing::warn!("Configuration allows no operations, every tool call will be rejected");
        }

        tracing::info!(
            provider = provider.name(),
            account = ?context.account,
            tools = ?catalogue.names(),
            "Toolkit initialized"
        );

        let dispatcher = Arc::new(Dispatcher::new(provider, &catalogue, context));

        Self { catalogue, dispatcher }
    }

    /// Allowed operations
    pub const fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub const fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// One tool per allowed operation, in catalogue order
    pub fn tools(&self, framework: Framework) -> Vec<FrameworkTool> {
        let adapter = framework.adapter();
        self.catalogue
            .iter()
            .map(|descriptor| FrameworkTool::new(descriptor.clone(), Arc::clone(&self.dispatcher), Arc::clone(&adapter)))
            .collect()
    }

    /// Framework-native declarations of every allowed tool
    pub fn declarations(&self, framework: Framework) -> Vec<Value> {
        let adapter = framework.adapter();
        self.catalogue.iter().map(|descriptor| adapter.declaration(descriptor)).collect()
    }

    /// Invoke a tool by name; unknown or disallowed names yield a failure envelope
    pub async fn invoke(&self, framework: Framework, name: &str, raw: Value) -> Value {
        let adapter = framework.adapter();
        adapter::invoke(adapter.as_ref(), &self.dispatcher, name, raw).await
    }

    /// End-of-run billing for `customer`
    pub fn billing_hooks(&self, customer: impl Into<String>, mode: BillingMode) -> BillingHooks {
        BillingHooks::new(Arc::clone(&self.dispatcher), customer, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use serde_json::json;
    use toolkit_core::{Action, Category, MockProviderClient};

    fn toolkit(configuration: &Configuration) -> (Toolkit, Arc<MockProviderClient>) {
        let mock = Arc::new(
            MockProviderClient::new()
                .with_object(json!({"id": "pi_1", "object": "payment_intent", "amount": 2000, "customer": "cus_1"})),
        );
        (Toolkit::new(mock.clone(), configuration), mock)
    }

    fn everything() -> Configuration {
        Category::ALL.into_iter().fold(Configuration::new(), |configuration, category| {
            [Action::Create, Action::List, Action::Update, Action::Retrieve]
                .into_iter()
                .fold(configuration, |configuration, action| configuration.allow(category, action))
        })
    }

    #[test]
    fn test_only_allowed_tools_are_exposed() {
        let configuration = Configuration::from_json_str(r#"{"actions": {"products": {"create": true}}}"#).unwrap();
        let (toolkit, _) = toolkit(&configuration);

        for framework in Framework::ALL {
            let tools = toolkit.tools(framework);
            assert_eq!(tools.len(), 1);
            assert_eq!(tools[0].name(), "create_product");
            assert_eq!(tools[0].framework(), framework);
        }
    }

    #[test]
    fn test_empty_configuration_exposes_nothing() {
        let (toolkit, _) = toolkit(&Configuration::new());
        assert!(toolkit.tools(Framework::Mcp).is_empty());
        assert!(toolkit.declarations(Framework::OpenAi).is_empty());
    }

    #[tokio::test]
    async fn test_disallowed_name_yields_failure_envelope() {
        let configuration = Configuration::new().allow(Category::Products, Action::Create);
        let (toolkit, mock) = toolkit(&configuration);

        let result = toolkit
            .invoke(Framework::Mcp, "create_refund", json!({"arguments": {"payment_intent": "pi_1"}}))
            .await;

        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("create_refund"));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_input_dispatches_with_empty_arguments() {
        let (toolkit, mock) = toolkit(&everything());

        let balance = toolkit.invoke(Framework::Strands, "retrieve_balance", json!("not-json{")).await;
        assert_eq!(balance["status"], "success");
        assert_eq!(balance["toolUseId"], "unknown");

        let customer = toolkit.invoke(Framework::OpenAi, "create_customer", json!("not-json{")).await;
        let text = customer.as_str().unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("missing required field 'name'"));
        assert_eq!(mock.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_mcp_call_without_arguments() {
        let (toolkit, mock) = toolkit(&everything());

        let balance = toolkit
            .invoke(Framework::Mcp, "retrieve_balance", json!({"name": "retrieve_balance"}))
            .await;
        assert_eq!(balance["isError"], false);

        let product = toolkit
            .invoke(Framework::Mcp, "create_product", json!({"name": "create_product"}))
            .await;
        assert_eq!(product["isError"], true);
        assert!(product["content"][0]["text"].as_str().unwrap().contains("missing required field 'name'"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/balance");
    }

    #[tokio::test]
    async fn test_refund_of_unknown_payment_is_reported() {
        let (toolkit, _) = toolkit(&everything());

        let result = toolkit
            .invoke(
                Framework::Strands,
                "create_refund",
                json!({"toolUseId": "r-1", "input": {"payment_intent": "pi_nonexistent"}}),
            )
            .await;

        assert_eq!(result["toolUseId"], "r-1");
        assert_eq!(result["status"], "error");
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("No such payment_intent: 'pi_nonexistent'"));
    }

    #[tokio::test]
    async fn test_strands_round_trip() {
        let (toolkit, _) = toolkit(&everything());
        let tool = toolkit
            .tools(Framework::Strands)
            .into_iter()
            .find(|t| t.name() == "create_product")
            .unwrap();

        let result = tool
            .invoke(json!({"toolUseId": "abc", "input": {"name": "test", "description": "100 units"}}))
            .await;

        assert_eq!(result["toolUseId"], "abc");
        assert_eq!(result["status"], "success");
    }

    #[tokio::test]
    async fn test_parallel_invocations_are_independent() {
        let (toolkit, mock) = toolkit(&everything());
        let tool = toolkit
            .tools(Framework::CrewAi)
            .into_iter()
            .find(|t| t.name() == "create_customer")
            .unwrap();

        let calls = (0..8).map(|i| tool.invoke(json!({"name": format!("Customer {i}")})));
        let results = join_all(calls).await;

        let mut ids: Vec<String> = results
            .iter()
            .map(|r| {
                let created: Value = serde_json::from_str(r.as_str().unwrap()).unwrap();
                created["id"].as_str().unwrap().to_string()
            })
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(mock.requests().len(), 8);
    }

    #[tokio::test]
    async fn test_billing_hooks_share_the_dispatcher() {
        let configuration = Configuration::new().with_account("acct_42");
        let (toolkit, mock) = toolkit(&configuration);

        toolkit
            .billing_hooks("cus_1", BillingMode::Outcome { meter: "agent_runs".into() })
            .on_end(None)
            .await;

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/billing/meter_events");
        assert_eq!(requests[0].account.as_deref(), Some("acct_42"));
    }
}
