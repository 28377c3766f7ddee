//! LangChain
//!
//! Accepts a tool call `{id, name, args}` or plain args and answers with a
//! `ToolMessage`-shaped object.

use serde_json::{Value, json};
use toolkit_core::ToolkitError;

use super::Framework;
use crate::adapter::{FrameworkAdapter, Invocation, failure_text};
use crate::envelope::EnvelopeFormat;

const FORMAT: EnvelopeFormat = EnvelopeFormat {
    framework: Framework::LangChain,
    argument_keys: &["args"],
    id_keys: &["id"],
    reserved_keys: &[],
    name_key: Some("name"),
};

pub struct LangChainAdapter;

impl LangChainAdapter {
    fn message(tool: &str, invocation: &Invocation, status: &str, content: String) -> Value {
        json!({
            "type": "tool",
            "name": tool,
            "tool_call_id": invocation.correlation_or_placeholder(),
            "status": status,
            "content": content,
        })
    }
}

impl FrameworkAdapter for LangChainAdapter {
    fn framework(&self) -> Framework {
        Framework::LangChain
    }

    fn unwrap_envelope(&self, tool: &str, raw: Value) -> Invocation {
        FORMAT.unwrap(tool, raw)
    }

    fn wrap_result(&self, tool: &str, output: String, invocation: &Invocation) -> Value {
        Self::message(tool, invocation, "success", output)
    }

    fn wrap_failure(&self, tool: &str, error: &ToolkitError, invocation: &Invocation) -> Value {
        Self::message(tool, invocation, "error", failure_text(error))
    }
}
