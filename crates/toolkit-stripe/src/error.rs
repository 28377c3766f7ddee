//! Stripe Client Error Types

use thiserror::Error;
use toolkit_core::ToolkitError;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Errors raised by the Stripe-backed client
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API or transport error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Connected account id is not a valid `acct_` id
    #[error("Invalid connected account: {0}")]
    InvalidAccount(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Stripe(_))
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        Self::Stripe(err.to_string())
    }
}

impl From<PaymentError> for ToolkitError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Stripe(msg) => Self::Provider(msg),
            PaymentError::InvalidAccount(_) | PaymentError::Config(_) => Self::Config(err.to_string()),
        }
    }
}
