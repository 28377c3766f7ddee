//! Error Types

use thiserror::Error;

/// Result type alias for toolkit operations
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Toolkit error types
#[derive(Error, Debug)]
pub enum ToolkitError {
    /// Operation name is not registered (absent from the catalogue or not allowed)
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Arguments do not match the operation's schema
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// The payment provider rejected or failed the call
    #[error("Provider error: {0}")]
    Provider(String),

    /// Framework handed over an envelope that could not be parsed
    #[error("Envelope parse error: {0}")]
    EnvelopeParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ToolkitError {
    /// Stable machine-readable code for this error
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownOperation(_) => "unknown_operation",
            Self::Validation(_) => "validation_failed",
            Self::Provider(_) => "provider_error",
            Self::EnvelopeParse(_) => "envelope_parse_error",
            Self::Config(_) => "config_error",
            Self::Json(_) => "serialization_error",
        }
    }

    /// Check if the failed call may succeed when retried
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Provider(_))
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownOperation(name) => format!("The operation '{name}' is not available."),
            Self::Validation(msg) => format!("Invalid tool input: {msg}"),
            Self::Provider(msg) => format!("The payment provider returned an error: {msg}"),
            Self::EnvelopeParse(_) => "The tool input could not be read.".into(),
            Self::Config(_) => "Toolkit configuration error.".into(),
            Self::Json(_) => "An unexpected error occurred.".into(),
        }
    }
}
