//! Payment Provider Integration
//!
//! The provider API is reached only through [`ProviderClient`]. Operation
//! handlers describe each call as a [`ProviderRequest`]; the client owns the
//! credential, transport, timeouts and retries.

mod mock;

pub use mock::MockProviderClient;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::configuration::Context;
use crate::error::Result;

/// HTTP verb of a provider call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One provider API call
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderRequest {
    pub method: Method,

    /// API path relative to the versioned base, e.g. `/customers`
    pub path: String,

    /// Query (GET) or form (POST) parameters; nested objects and arrays are
    /// bracket-encoded by the client
    pub params: Map<String, Value>,

    /// Connected account override
    pub account: Option<String>,
}

impl ProviderRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Map::new(),
            account: None,
        }
    }

    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Add a parameter only when a value is present
    #[must_use]
    pub fn param_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Scope the call to the context's connected account, if any
    #[must_use]
    pub fn scoped(mut self, context: &Context) -> Self {
        self.account.clone_from(&context.account);
        self
    }
}

/// Provider client trait (Strategy pattern)
///
/// Implemented by the Stripe-backed client and by [`MockProviderClient`].
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Send one request and return the decoded response body
    async fn send(&self, request: ProviderRequest) -> Result<Value>;

    /// Provider name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::get("/customers")
            .param("email", "a@b.c")
            .param_opt("limit", None::<i64>)
            .scoped(&Context::for_account("acct_1"));

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.params.get("email"), Some(&json!("a@b.c")));
        assert!(!request.params.contains_key("limit"));
        assert_eq!(request.account.as_deref(), Some("acct_1"));
    }
}
