//! Dispatcher
//!
//! Single entry point for running an operation by name: look it up among the
//! registered (allowed) operations, validate and coerce the arguments, run
//! the handler against the provider, and serialize the result to JSON text.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::catalogue::{Catalogue, OperationDescriptor};
use crate::configuration::Context;
use crate::error::{Result, ToolkitError};
use crate::metering::MeterEvent;
use crate::operations;
use crate::provider::ProviderClient;

/// Validates and executes catalogue operations
///
/// Only operations present in the catalogue given at construction are
/// registered; anything else is rejected with
/// [`ToolkitError::UnknownOperation`]. Holds no mutable state, so calls may
/// be interleaved freely.
pub struct Dispatcher {
    provider: Arc<dyn ProviderClient>,
    context: Context,
    operations: HashMap<&'static str, OperationDescriptor>,
}

impl Dispatcher {
    /// Register every operation in `catalogue` (normally the filtered one)
    pub fn new(provider: Arc<dyn ProviderClient>, catalogue: &Catalogue, context: Context) -> Self {
        let operations = catalogue
            .iter()
            .map(|descriptor| (descriptor.name, descriptor.clone()))
            .collect();

        Self {
            provider,
            context,
            operations,
        }
    }

    pub const fn context(&self) -> &Context {
        &self.context
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn descriptor(&self, name: &str) -> Option<&OperationDescriptor> {
        self.operations.get(name)
    }

    /// Number of registered operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Run an operation and return its result as canonical JSON text
    pub async fn run(&self, name: &str, raw_arguments: &Map<String, Value>) -> Result<String> {
        let descriptor = self
            .operations
            .get(name)
            .ok_or_else(|| ToolkitError::UnknownOperation(name.to_string()))?;

        let arguments = descriptor.schema.validate(raw_arguments).inspect_err(|e| {
            tracing::debug!(operation = %name, error = %e, "Rejected arguments");
        })?;

        tracing::debug!(
            operation = %name,
            account = ?self.context.account,
            "Dispatching operation"
        );

        let result = operations::execute(
            descriptor.operation,
            self.provider.as_ref(),
            &self.context,
            &arguments,
        )
        .await
        .inspect_err(|e| {
            tracing::warn!(operation = %name, error = %e, "Operation failed");
        })?;

        Ok(serde_json::to_string(&result)?)
    }

    /// Record a usage event. Failures are logged and swallowed.
    pub async fn record_meter_event(&self, event_name: &str, customer: &str, value: Option<String>) {
        let event = MeterEvent::new(event_name, customer, value);
        let request = event.to_request().scoped(&self.context);

        match self.provider.send(request).await {
            Ok(_) => tracing::debug!(
                event_name = %event.event_name,
                identifier = %event.identifier,
                "Recorded meter event"
            ),
            Err(e) => tracing::warn!(
                event_name = %event.event_name,
                customer = %event.customer,
                error = %e,
                "Failed to record meter event"
            ),
        }
    }
}
