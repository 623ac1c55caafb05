//! Error types for the text generation client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, GenAiError>;

/// Text generation client errors.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Missing API key or invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failed, timed out, or was reset
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the provider
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered but without usable text
    #[error("Empty response: {0}")]
    Empty(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl GenAiError {
    /// HTTP status reported by the provider, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenAiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body reported by the provider, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            GenAiError::Api { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}
