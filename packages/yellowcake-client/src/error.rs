use thiserror::Error;

pub type Result<T> = std::result::Result<T, YellowcakeError>;

#[derive(Debug, Error)]
pub enum YellowcakeError {
    /// Missing API key or invalid settings
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure before or during the stream
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-2xx response from the extraction API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Malformed server-sent event frame
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for YellowcakeError {
    fn from(e: reqwest::Error) -> Self {
        YellowcakeError::Http(e.to_string())
    }
}
