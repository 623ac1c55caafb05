//! Error types for restaurant synchronization.

use thiserror::Error;

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors raised by stores and producers.
///
/// The reconciler never hands these to its subscribers. It logs them and
/// degrades to cached or sample data instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Key-value store could not be read or written
    #[error("storage error: {0}")]
    Storage(String),

    /// A producer's remote endpoint failed
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        status: Option<u16>,
    },

    /// A payload could not be interpreted as restaurant data
    #[error("parse error: {0}")]
    Parse(String),

    /// Stored JSON could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SyncError {
    pub fn upstream(message: impl Into<String>) -> Self {
        SyncError::Upstream {
            message: message.into(),
            status: None,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<yellowcake_client::YellowcakeError> for SyncError {
    fn from(e: yellowcake_client::YellowcakeError) -> Self {
        use yellowcake_client::YellowcakeError;
        match e {
            YellowcakeError::Api { status, message } => SyncError::Upstream {
                message,
                status: Some(status),
            },
            YellowcakeError::Parse(message) => SyncError::Parse(message),
            other => SyncError::upstream(other.to_string()),
        }
    }
}
