//! Model Context Protocol
//!
//! `tools/call` params are `{name, arguments}`; results are a content list
//! with an `isError` flag.

use serde_json::{Value, json};
use toolkit_core::{OperationDescriptor, ToolkitError};

use super::Framework;
use crate::adapter::{FrameworkAdapter, Invocation, failure_text};
use crate::envelope::EnvelopeFormat;

const FORMAT: EnvelopeFormat = EnvelopeFormat {
    framework: Framework::Mcp,
    argument_keys: &["arguments"],
    id_keys: &[],
    reserved_keys: &[],
    name_key: Some("name"),
};

pub struct McpAdapter;

fn call_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "isError": is_error,
    })
}

impl FrameworkAdapter for McpAdapter {
    fn framework(&self) -> Framework {
        Framework::Mcp
    }

    fn unwrap_envelope(&self, tool: &str, raw: Value) -> Invocation {
        FORMAT.unwrap(tool, raw)
    }

    fn wrap_result(&self, _tool: &str, output: String, _invocation: &Invocation) -> Value {
        call_result(output, false)
    }

    fn wrap_failure(&self, _tool: &str, error: &ToolkitError, _invocation: &Invocation) -> Value {
        call_result(failure_text(error), true)
    }

    fn declaration(&self, descriptor: &OperationDescriptor) -> Value {
        json!({
            "name": descriptor.name,
            "title": descriptor.title,
            "description": descriptor.description,
            "inputSchema": self.project_schema(descriptor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolkit_core::Operation;

    #[test]
    fn test_call_params() {
        let invocation = McpAdapter.unwrap_envelope("create_price", json!({
            "name": "create_price",
            "arguments": {"product": "prod_1", "unit_amount": 500, "currency": "usd"}
        }));
        assert_eq!(invocation.arguments.len(), 3);
    }

    #[test]
    fn test_call_params_without_arguments() {
        let invocation = McpAdapter.unwrap_envelope("retrieve_balance", json!({"name": "retrieve_balance"}));
        assert!(invocation.arguments.is_empty());

        let customer = McpAdapter.unwrap_envelope("create_customer", json!({"name": "Ada"}));
        assert_eq!(customer.arguments["name"], "Ada");
    }

    #[test]
    fn test_error_flag() {
        let invocation = Invocation::empty();
        assert_eq!(McpAdapter.wrap_result("t", "[]".into(), &invocation)["isError"], false);

        let failure = McpAdapter.wrap_failure("t", &ToolkitError::Provider("declined".into()), &invocation);
        assert_eq!(failure["isError"], true);
        assert_eq!(failure["content"][0]["type"], "text");
    }

    #[test]
    fn test_tool_listing_entry() {
        let entry = McpAdapter.declaration(&Operation::RetrieveBalance.descriptor());
        assert_eq!(entry["title"], "Retrieve Balance");
        assert_eq!(entry["inputSchema"]["properties"], json!({}));
    }
}
