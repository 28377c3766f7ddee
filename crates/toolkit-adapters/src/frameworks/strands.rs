//! Strands Agents
//!
//! Tool use blocks carry `toolUseId` and `input`; results echo the id with a
//! status and a list of text content blocks.

use serde_json::{Value, json};
use toolkit_core::{OperationDescriptor, ToolkitError};

use super::Framework;
use crate::adapter::{FrameworkAdapter, Invocation, failure_text};
use crate::envelope::EnvelopeFormat;

const FORMAT: EnvelopeFormat = EnvelopeFormat {
    framework: Framework::Strands,
    argument_keys: &["input"],
    id_keys: &[],
    reserved_keys: &["toolUseId"],
    name_key: Some("name"),
};

pub struct StrandsAdapter;

impl StrandsAdapter {
    fn envelope(invocation: &Invocation, status: &str, text: String) -> Value {
        json!({
            "toolUseId": invocation.correlation_or_placeholder(),
            "status": status,
            "content": [{"text": text}],
        })
    }
}

impl FrameworkAdapter for StrandsAdapter {
    fn framework(&self) -> Framework {
        Framework::Strands
    }

    fn unwrap_envelope(&self, tool: &str, raw: Value) -> Invocation {
        FORMAT.unwrap(tool, raw)
    }

    fn wrap_result(&self, _tool: &str, output: String, invocation: &Invocation) -> Value {
        Self::envelope(invocation, "success", output)
    }

    fn wrap_failure(&self, _tool: &str, error: &ToolkitError, invocation: &Invocation) -> Value {
        Self::envelope(invocation, "error", failure_text(error))
    }

    fn declaration(&self, descriptor: &OperationDescriptor) -> Value {
        json!({
            "toolSpec": {
                "name": descriptor.name,
                "description": descriptor.description,
                "inputSchema": {"json": self.project_schema(descriptor)},
            }
        })
    }
}
