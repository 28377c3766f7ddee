//! Usage Metering
//!
//! Meter events feed usage-based billing. They are recorded through the
//! dispatcher's side channel, which never fails the caller, and by
//! [`BillingHooks`] at the end of an agent run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::dispatcher::Dispatcher;
use crate::provider::ProviderRequest;

/// One usage event for a billing meter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterEvent {
    /// Meter event name configured on the provider
    pub event_name: String,

    /// Provider customer the usage belongs to
    pub customer: String,

    /// Usage quantity; the provider defaults to 1 when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Idempotency identifier
    pub identifier: String,

    /// Unix timestamp of the usage
    pub timestamp: i64,
}

impl MeterEvent {
    pub fn new(event_name: impl Into<String>, customer: impl Into<String>, value: Option<String>) -> Self {
        Self {
            event_name: event_name.into(),
            customer: customer.into(),
            value,
            identifier: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Provider request for this event (unscoped)
    pub fn to_request(&self) -> ProviderRequest {
        let mut payload = json!({ "stripe_customer_id": self.customer });
        if let Some(value) = &self.value {
            payload["value"] = json!(value);
        }

        ProviderRequest::post("/billing/meter_events")
            .param("event_name", self.event_name.as_str())
            .param("payload", payload)
            .param("identifier", self.identifier.as_str())
            .param("timestamp", self.timestamp)
    }
}

/// Token counts reported by a framework at the end of a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub input_tokens: u64,

    #[serde(default)]
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Extract usage from a framework record, either flat or nested under `usage`
    ///
    /// `input_tokens`/`output_tokens` win over the `prompt_tokens`/
    /// `completion_tokens` spellings when a record carries both.
    pub fn from_value(value: &Value) -> Option<Self> {
        let record = value.get("usage").unwrap_or(value);
        let Some(fields) = record.as_object() else {
            tracing::debug!("Run record carries no token usage object");
            return None;
        };

        let usage = Self {
            input_tokens: token_count(fields, &["input_tokens", "prompt_tokens"]),
            output_tokens: token_count(fields, &["output_tokens", "completion_tokens"]),
        };

        if usage == Self::default() {
            tracing::debug!(keys = ?fields.keys().collect::<Vec<_>>(), "Run record reports no token counts");
            return None;
        }
        Some(usage)
    }
}

/// First readable count among `keys`; fractional counts are truncated
fn token_count(fields: &serde_json::Map<String, Value>, keys: &[&str]) -> u64 {
    keys.iter()
        .find_map(|key| {
            let value = fields.get(*key)?;
            let count = count_of(value);
            if count.is_none() {
                tracing::warn!(key = %key, value = %value, "Ignoring unreadable token count");
            }
            count
        })
        .unwrap_or(0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_of(value: &Value) -> Option<u64> {
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    value
        .as_f64()
        .filter(|count| count.is_finite() && *count >= 0.0)
        .map(|count| count.trunc() as u64)
}

/// How an agent run is billed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BillingMode {
    /// One event per completed run
    Outcome { meter: String },

    /// Token counts as event values, one meter per direction
    Token {
        #[serde(default)]
        input_meter: Option<String>,
        #[serde(default)]
        output_meter: Option<String>,
    },
}

/// End-of-run billing for agent frameworks that expose lifecycle hooks
pub struct BillingHooks {
    dispatcher: Arc<Dispatcher>,
    customer: String,
    mode: BillingMode,
}

impl BillingHooks {
    pub fn new(dispatcher: Arc<Dispatcher>, customer: impl Into<String>, mode: BillingMode) -> Self {
        Self {
            dispatcher,
            customer: customer.into(),
            mode,
        }
    }

    pub const fn mode(&self) -> &BillingMode {
        &self.mode
    }

    /// Called when an agent run finishes
    pub async fn on_end(&self, usage: Option<TokenUsage>) {
        match &self.mode {
            BillingMode::Outcome { meter } => {
                self.dispatcher
                    .record_meter_event(meter, &self.customer, None)
                    .await;
            }
            BillingMode::Token {
                input_meter,
                output_meter,
            } => {
                let Some(usage) = usage else {
                    tracing::debug!(customer = %self.customer, "No token usage reported, nothing to bill");
                    return;
                };

                if let (Some(meter), true) = (input_meter, usage.input_tokens > 0) {
                    self.dispatcher
                        .record_meter_event(meter, &self.customer, Some(usage.input_tokens.to_string()))
                        .await;
                }
                if let (Some(meter), true) = (output_meter, usage.output_tokens > 0) {
                    self.dispatcher
                        .record_meter_event(meter, &self.customer, Some(usage.output_tokens.to_string()))
                        .await;
                }
            }
        }
    }
}
