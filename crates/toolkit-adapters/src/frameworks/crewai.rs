//! CrewAI
//!
//! Tools are called with keyword arguments and return plain text.

use serde_json::Value;
use toolkit_core::ToolkitError;

use super::Framework;
use crate::adapter::{FrameworkAdapter, Invocation, failure_text};
use crate::envelope::EnvelopeFormat;

const FORMAT: EnvelopeFormat = EnvelopeFormat {
    framework: Framework::CrewAi,
    argument_keys: &[],
    id_keys: &[],
    reserved_keys: &[],
    name_key: None,
};

pub struct CrewAiAdapter;

impl FrameworkAdapter for CrewAiAdapter {
    fn framework(&self) -> Framework {
        Framework::CrewAi
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
}
