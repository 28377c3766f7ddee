//! Envelope Unwrapping
//!
//! Frameworks hand tool input over in several shapes: a flat argument
//! object, an object wrapped under a framework key, or either of those
//! encoded as a JSON string. Input that cannot be read is replaced by empty
//! arguments so that validation reports the missing fields.

use serde_json::{Map, Value};

use crate::adapter::Invocation;
use crate::frameworks::Framework;

/// Where one framework puts arguments and correlation ids
pub(crate) struct EnvelopeFormat {
    pub framework: Framework,

    /// Keys that hold the arguments inside a wrapping envelope
    pub argument_keys: &'static [&'static str],

    /// Correlation id keys of the wrapping envelope
    pub id_keys: &'static [&'static str],

    /// Correlation id keys that are never arguments, recognised on flat input too
    pub reserved_keys: &'static [&'static str],

    /// Envelope key naming the called tool. An object whose value here equals
    /// the invoked tool is an envelope even when its argument key is absent.
    pub name_key: Option<&'static str>,
}

impl EnvelopeFormat {
    pub fn unwrap(&self, tool: &str, raw: Value) -> Invocation {
        let Some(object) = self.decode(raw, "envelope") else {
            return Invocation::empty();
        };

        let wrapped = self
            .argument_keys
            .iter()
            .find_map(|key| object.get(*key).map(|inner| (*key, inner)));

        match wrapped {
            Some((key, inner)) => {
                let arguments = self.decode(inner.clone(), key).unwrap_or_default();
                Invocation {
                    arguments,
                    correlation_id: find_id(&object, self.id_keys.iter().chain(self.reserved_keys)),
                }
            }
            None if self.names_tool(&object, tool) => Invocation {
                arguments: Map::new(),
                correlation_id: find_id(&object, self.id_keys.iter().chain(self.reserved_keys)),
            },
            None => {
                let correlation_id = find_id(&object, self.reserved_keys.iter());
                let mut arguments = object;
                for key in self.reserved_keys {
                    arguments.remove(*key);
                }
                Invocation {
                    arguments,
                    correlation_id,
                }
            }
        }
    }

    fn names_tool(&self, object: &Map<String, Value>, tool: &str) -> bool {
        self.name_key
            .and_then(|key| object.get(key))
            .and_then(Value::as_str)
            .is_some_and(|name| name == tool)
    }

    /// Object from a value or a JSON-encoded string; `None` with a warning otherwise
    fn decode(&self, value: Value, part: &str) -> Option<Map<String, Value>> {
        let value = match value {
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!(
                        framework = %self.framework,
                        part = %part,
                        error = %e,
                        "Tool input is not valid JSON, dispatching with empty arguments"
                    );
                    return None;
                }
            },
            other => other,
        };

        match value {
            Value::Object(object) => Some(object),
            Value::Null => None,
            other => {
                tracing::warn!(
                    framework = %self.framework,
                    part = %part,
                    found = json_type(&other),
                    "Tool input is not an object, dispatching with empty arguments"
                );
                None
            }
        }
    }
}

fn find_id<'a>(object: &Map<String, Value>, mut keys: impl Iterator<Item = &'a &'static str>) -> Option<String> {
    keys.find_map(|key| match object.get(*key)? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    })
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
