//! Stripe Provider Client
//!
//! Sends [`ProviderRequest`]s through `async-stripe`'s generic transport.
//! GET parameters go out as a query string, POST parameters as a
//! bracket-encoded form; the response body is returned undecoded as JSON.

use async_trait::async_trait;
use serde_json::Value;
use stripe::{AccountId, Client, RequestStrategy};
use toolkit_core::{Method, ProviderClient, ProviderRequest};

use crate::error::{PaymentError, Result};

const APP_NAME: &str = "payment-agent-toolkit";
const APP_URL: &str = "https://github.com/payment-agent-toolkit/toolkit";

/// Retries for idempotent (GET) calls
const DEFAULT_READ_RETRIES: u32 = 2;

/// Stripe client wrapper
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    read_retries: u32,
}

impl StripeClient {
    /// Create a new Stripe client, identifying the toolkit in the user agent
    pub fn new(secret_key: &str) -> Result<Self> {
        if secret_key.trim().is_empty() {
            return Err(PaymentError::Config("Stripe secret key is empty".into()));
        }

        let client = Client::new(secret_key).with_app_info(
            APP_NAME.to_string(),
            Some(env!("CARGO_PKG_VERSION").to_string()),
            Some(APP_URL.to_string()),
        );

        Ok(Self {
            client,
            read_retries: DEFAULT_READ_RETRIES,
        })
    }

    /// Create from the `STRIPE_SECRET_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Self::new(&secret_key)
    }

    #[must_use]
    pub const fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    /// Client for one request: account scope and retry strategy applied
    fn client_for(&self, request: &ProviderRequest) -> Result<Client> {
        let strategy = match request.method {
            Method::Get if self.read_retries > 0 => RequestStrategy::ExponentialBackoff(self.read_retries),
            Method::Get | Method::Post => RequestStrategy::Once,
        };
        let mut client = self.client.clone().with_strategy(strategy);

        if let Some(account) = &request.account {
            let account_id: AccountId = account
                .parse()
                .map_err(|_| PaymentError::InvalidAccount(account.clone()))?;
            client = client.with_stripe_account(account_id);
        }

        Ok(client)
    }

    async fn execute(&self, request: &ProviderRequest) -> Result<Value> {
        let client = self.client_for(request)?;

        let response = match request.method {
            Method::Get => client.get_query::<Value, _>(&request.path, &request.params).await,
            Method::Post => client.post_form::<Value, _>(&request.path, &request.params).await,
        };

        Ok(response?)
    }
}

#[async_trait]
impl ProviderClient for StripeClient {
    async fn send(&self, request: ProviderRequest) -> toolkit_core::Result<Value> {
        tracing::debug!(
            method = ?request.method,
            path = %request.path,
            account = ?request.account,
            "Calling Stripe"
        );

        self.execute(&request).await.map_err(|e| {
            tracing::warn!(path = %request.path, error = %e, "Stripe call failed");
            e.into()
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}
