//! Adapter Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors raised while selecting an adapter
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AdapterError {
    /// No adapter is registered under this framework name
    #[error("Unknown framework: {0}")]
    UnknownFramework(String),
}

impl AdapterError {
    /// Get user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownFramework(name) => format!(
                "'{name}' is not a supported framework (expected one of: openai, strands, crewai, langchain, mcp, camel)."
            ),
        }
    }
}
