//! Framework Adapter Trait

use std::sync::Arc;

use serde_json::{Map, Value, json};
use toolkit_core::{Dispatcher, OperationDescriptor, ToolkitError};

use crate::frameworks::Framework;

/// Arguments and correlation id extracted from a framework envelope
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Invocation {
    pub arguments: Map<String, Value>,
    pub correlation_id: Option<String>,
}

impl Invocation {
    pub fn empty() -> Self {
        Self {
            arguments: Map::new(),
            correlation_id: None,
        }
    }

    /// Correlation id, or `"unknown"` for frameworks that require one
    pub fn correlation_or_placeholder(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or("unknown")
    }
}

/// Framework adapter trait (Strategy pattern)
///
/// Translates between one framework's tool-calling conventions and the
/// dispatcher. Implementations hold no state.
pub trait FrameworkAdapter: Send + Sync {
    fn framework(&self) -> Framework;

    /// Extract arguments for `tool` from whatever the framework handed over.
    /// Never fails; unreadable input yields empty arguments.
    fn unwrap_envelope(&self, tool: &str, raw: Value) -> Invocation;

    /// Wrap dispatcher output (JSON text) in the framework's result shape
    fn wrap_result(&self, tool: &str, output: String, invocation: &Invocation) -> Value;

    /// Wrap an error in the framework's result shape
    fn wrap_failure(&self, tool: &str, error: &ToolkitError, invocation: &Invocation) -> Value;

    /// Input schema as a closed JSON Schema object
    fn project_schema(&self, descriptor: &OperationDescriptor) -> Value {
        let mut schema = descriptor.schema.to_json_schema();
        schema["additionalProperties"] = Value::Bool(false);
        schema
    }

    /// Framework-native tool declaration
    fn declaration(&self, descriptor: &OperationDescriptor) -> Value {
        json!({
            "name": descriptor.name,
            "description": descriptor.description,
            "args_schema": self.project_schema(descriptor),
        })
    }
}

/// Text shown to the agent for a failed call
pub(crate) fn failure_text(error: &ToolkitError) -> String {
    format!("Error: {}", error.user_message())
}

/// Unwrap, dispatch and wrap one call
pub(crate) async fn invoke(adapter: &dyn FrameworkAdapter, dispatcher: &Dispatcher, tool: &str, raw: Value) -> Value {
    let invocation = adapter.unwrap_envelope(tool, raw);

    tracing::debug!(
        framework = %adapter.framework(),
        tool = %tool,
        correlation_id = ?invocation.correlation_id,
        "Invoking tool"
    );

    match dispatcher.run(tool, &invocation.arguments).await {
        Ok(output) => adapter.wrap_result(tool, output, &invocation),
        Err(e) => {
            tracing::info!(
                framework = %adapter.framework(),
                tool = %tool,
                kind = e.kind(),
                error = %e,
                "Tool call failed"
            );
            adapter.wrap_failure(tool, &e, &invocation)
        }
    }
}

/// One allowed operation presented in a framework's native shape
#[derive(Clone)]
pub struct FrameworkTool {
    descriptor: OperationDescriptor,
    dispatcher: Arc<Dispatcher>,
    adapter: Arc<dyn FrameworkAdapter>,
}

impl FrameworkTool {
    pub fn new(descriptor: OperationDescriptor, dispatcher: Arc<Dispatcher>, adapter: Arc<dyn FrameworkAdapter>) -> Self {
        Self {
            descriptor,
            dispatcher,
            adapter,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub const fn description(&self) -> &'static str {
        self.descriptor.description
    }

    pub fn framework(&self) -> Framework {
        self.adapter.framework()
    }

    pub const fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    pub fn input_schema(&self) -> Value {
        self.adapter.project_schema(&self.descriptor)
    }

    pub fn declaration(&self) -> Value {
        self.adapter.declaration(&self.descriptor)
    }

    /// Run the tool on a raw framework input; always returns a result envelope
    pub async fn invoke(&self, raw: Value) -> Value {
        invoke(self.adapter.as_ref(), &self.dispatcher, self.descriptor.name, raw).await
    }
}

impl std::fmt::Debug for FrameworkTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkTool")
            .field("name", &self.descriptor.name)
            .field("framework", &self.adapter.framework())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frameworks::{CrewAiAdapter, McpAdapter, StrandsAdapter};
    use toolkit_core::{Catalogue, Context, MockProviderClient, Operation};

    fn tool(operation: Operation, adapter: Arc<dyn FrameworkAdapter>) -> FrameworkTool {
        let dispatcher = Dispatcher::new(Arc::new(MockProviderClient::new()), &Catalogue::standard(), Context::default());
        FrameworkTool::new(operation.descriptor(), Arc::new(dispatcher), adapter)
    }

    #[test]
    fn test_projection_is_closed_and_idempotent() {
        let tool = tool(Operation::CreateProduct, Arc::new(McpAdapter));

        let first = serde_json::to_string(&tool.input_schema()).unwrap();
        let second = serde_json::to_string(&tool.input_schema()).unwrap();
        assert_eq!(first, second);

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["name"]));
    }

    #[tokio::test]
    async fn test_invoke_returns_result_envelope() {
        let tool = tool(Operation::CreateProduct, Arc::new(StrandsAdapter));
        let result = tool
            .invoke(json!({"toolUseId": "t-1", "input": {"name": "Widget"}}))
            .await;

        assert_eq!(result["status"], "success");
        assert_eq!(result["toolUseId"], "t-1");
        let text = result["content"][0]["text"].as_str().unwrap();
        let product: Value = serde_json::from_str(text).unwrap();
        assert_eq!(product["name"], "Widget");
    }

    #[tokio::test]
    async fn test_invoke_never_raises_on_bad_arguments() {
        let tool = tool(Operation::CreateProduct, Arc::new(CrewAiAdapter));
        let result = tool.invoke(json!({"colour": "red"})).await;

        let text = result.as_str().unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("colour"));
        assert!(text.contains("name"));
    }

    #[test]
    fn test_placeholder_correlation_id() {
        assert_eq!(Invocation::empty().correlation_or_placeholder(), "unknown");
    }
}
