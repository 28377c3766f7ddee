//! OpenAI Agents
//!
//! Tools receive their input as a JSON string and return plain text.

use serde_json::{Value, json};
use toolkit_core::{OperationDescriptor, ToolkitError};

use super::Framework;
use crate::adapter::{FrameworkAdapter, Invocation, failure_text};
use crate::envelope::EnvelopeFormat;

const FORMAT: EnvelopeFormat = EnvelopeFormat {
    framework: Framework::OpenAi,
    argument_keys: &["arguments"],
    id_keys: &[],
    reserved_keys: &["call_id"],
    name_key: Some("name"),
};

pub struct OpenAiAdapter;

impl FrameworkAdapter for OpenAiAdapter {
    fn framework(&self) -> Framework {
        Framework::OpenAi
    }

    fn unwrap_envelope(&self, tool: &str, raw: Value) -> Invocation {
        FORMAT.unwrap(tool, raw)
    }

    fn wrap_result(&self, _tool: &str, output: String, _invocation: &Invocation) -> Value {
        Value::String(output)
    }

    fn wrap_failure(&self, _tool: &str, error: &ToolkitError, _invocation: &Invocation) -> Value {
        Value::String(failure_text(error))
    }

    fn declaration(&self, descriptor: &OperationDescriptor) -> Value {
        json!({
            "type": "function",
            "name": descriptor.name,
            "description": descriptor.description,
            "parameters": self.project_schema(descriptor),
            "strict": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolkit_core::Operation;

    #[test]
    fn test_input_str() {
        let invocation = OpenAiAdapter.unwrap_envelope("create_customer", json!("{\"email\": \"ada@example.com\"}"));
        assert_eq!(invocation.arguments["email"], "ada@example.com");
    }

    #[test]
    fn test_function_call_item() {
        let invocation = OpenAiAdapter.unwrap_envelope("list_customers", json!({
            "type": "function_call",
            "call_id": "call_9",
            "name": "list_customers",
            "arguments": "{\"limit\": 2}"
        }));
        assert_eq!(invocation.arguments["limit"], 2);
        assert_eq!(invocation.correlation_id.as_deref(), Some("call_9"));
    }

    #[test]
    fn test_text_results() {
        let invocation = Invocation::empty();
        assert_eq!(OpenAiAdapter.wrap_result("t", "{\"id\":\"x\"}".into(), &invocation), json!("{\"id\":\"x\"}"));

        let failure = OpenAiAdapter.wrap_failure("t", &ToolkitError::UnknownOperation("t".into()), &invocation);
        assert_eq!(failure, json!("Error: The operation 't' is not available."));
    }

    #[test]
    fn test_declaration() {
        let declaration = OpenAiAdapter.declaration(&Operation::ListCustomers.descriptor());
        assert_eq!(declaration["type"], "function");
        assert_eq!(declaration["name"], "list_customers");
        assert_eq!(declaration["parameters"]["additionalProperties"], false);
    }
}
