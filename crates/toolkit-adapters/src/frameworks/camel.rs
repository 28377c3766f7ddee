//! CAMEL
//!
//! Tools are plain callables taking keyword arguments and returning text.
//! CAMEL describes them to the model with the chat-completions function
//! schema.

use serde_json::{Value, json};
use toolkit_core::{OperationDescriptor, ToolkitError};

use super::Framework;
use crate::adapter::{FrameworkAdapter, Invocation, failure_text};
use crate::envelope::EnvelopeFormat;

const FORMAT: EnvelopeFormat = EnvelopeFormat {
    framework: Framework::Camel,
    argument_keys: &[],
    id_keys: &[],
    reserved_keys: &[],
    name_key: None,
};

pub struct CamelAdapter;

impl FrameworkAdapter for CamelAdapter {
    fn framework(&self) -> Framework {
        Framework::Camel
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
            "function": {
                "name": descriptor.name,
                "description": descriptor.description,
                "parameters": self.project_schema(descriptor),
            }
        })
    }
}
