//! Pure Yellowcake streaming extraction API client.
//!
//! Yellowcake renders a page, applies a natural-language extraction
//! instruction, and streams results back as server-sent events. Each `chunk`
//! event carries one extracted JSON record.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use yellowcake_client::{SseEventStream, YellowcakeClient};
//!
//! let client = YellowcakeClient::from_env()?;
//! let bytes = client
//!     .extract_stream("https://example.com/menu", "Extract dishes: name, price")
//!     .await?;
//! let mut events = SseEventStream::new(bytes);
//! while let Some(event) = events.next().await {
//!     println!("{:?}", event?);
//! }
//! ```

pub mod error;
pub mod sse;
pub mod types;

pub use error::{Result, YellowcakeError};
pub use sse::{SseDecoder, SseEvent, SseEventStream};
pub use types::ExtractStreamRequest;

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};

pub const BASE_URL: &str = "https://api.yellowcake.dev/v1";

/// Raw upstream bytes, already framed as server-sent events.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

#[derive(Clone)]
pub struct YellowcakeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YellowcakeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `YELLOWCAKE_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("YELLOWCAKE_API_KEY")
            .map_err(|_| YellowcakeError::Config("YELLOWCAKE_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Open one extraction stream.
    ///
    /// Resolves once the upstream has accepted the request, so connection
    /// failures and non-2xx statuses surface here rather than mid-stream.
    /// The returned bytes are relayed untouched.
    pub async fn extract_stream(&self, url: &str, prompt: &str) -> Result<ByteStream> {
        let body = ExtractStreamRequest {
            url: url.to_string(),
            prompt: prompt.to_string(),
        };

        tracing::info!(target_url = url, "Opening Yellowcake extraction stream");

        let resp = self
            .client
            .post(format!("{}/extract-stream", self.base_url))
            .header("X-API-Key", &self.api_key)
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %message, "Yellowcake rejected extraction");
            return Err(YellowcakeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp
            .bytes_stream()
            .map(|chunk| chunk.map_err(YellowcakeError::from))
            .boxed())
    }
}
