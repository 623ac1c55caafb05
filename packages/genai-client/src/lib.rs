//! Text generation client for OpenAI-compatible chat completion APIs.
//!
//! Speaks the `/chat/completions` wire format, which both OpenAI and Google's
//! Gemini compatibility endpoint accept. The default base URL points at Gemini.
//!
//! # Example
//!
//! ```rust,ignore
//! use genai_client::GenAiClient;
//!
//! let client = GenAiClient::from_env("GEMINI_API_KEY")?;
//! let text = client.generate_text("gemini-2.5-flash", "Say hi").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{GenAiError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

/// Gemini's OpenAI-compatible endpoint.
pub const GEMINI_OPENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// OpenAI-compatible chat completion client.
#[derive(Clone)]
pub struct GenAiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl GenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_OPENAI_BASE_URL.to_string(),
        }
    }

    /// Create from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self> {
        let api_key =
            std::env::var(var).map_err(|_| GenAiError::Config(format!("{} not set", var)))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (OpenAI, proxies, local gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Sends the conversation once; there is no retry.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        if self.api_key.trim().is_empty() {
            return Err(GenAiError::Config("API key is empty".into()));
        }

        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chat completion request failed");
                GenAiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Chat completion API error");
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| GenAiError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }

    /// Prompt in, text out.
    ///
    /// Fails with [`GenAiError::Empty`] when the provider returns no text.
    pub async fn generate_text(&self, model: &str, prompt: &str) -> Result<String> {
        let response = self
            .chat_completion(ChatRequest::prompt(model, prompt))
            .await?;

        if response.content.trim().is_empty() {
            return Err(GenAiError::Empty(format!("model {} returned no text", model)));
        }

        Ok(response.content)
    }
}
