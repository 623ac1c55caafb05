//! Server dependencies and the adapters binding kernel traits to real clients.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures::StreamExt;
use genai_client::GenAiClient;
use tracing::{debug, warn};
use yellowcake_client::YellowcakeClient;

use super::traits::{BaseAI, BaseExtractor, BaseWebhook, RelayStream};
use crate::common::ApiError;
use crate::config::Config;

/// Model names per task.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub plan: String,
    pub summary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            plan: crate::config::DEFAULT_PLAN_MODEL.to_string(),
            summary: crate::config::DEFAULT_SUMMARY_MODEL.to_string(),
        }
    }
}

/// Everything a handler needs, behind traits so tests can swap in mocks.
#[derive(Clone)]
pub struct ServerDeps {
    pub ai: Arc<dyn BaseAI>,
    pub extractor: Arc<dyn BaseExtractor>,
    pub webhook: Arc<dyn BaseWebhook>,
    pub models: ModelConfig,
}

impl ServerDeps {
    pub fn new(
        ai: Arc<dyn BaseAI>,
        extractor: Arc<dyn BaseExtractor>,
        webhook: Arc<dyn BaseWebhook>,
        models: ModelConfig,
    ) -> Self {
        Self {
            ai,
            extractor,
            webhook,
            models,
        }
    }

    /// Wire real clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(GenAiAdapter::new(
                config.gemini_api_key.clone(),
                &config.ai_base_url,
            )),
            Arc::new(YellowcakeAdapter::new(
                config.yellowcake_api_key.clone(),
                &config.yellowcake_base_url,
            )),
            Arc::new(HttpWebhook::new(config.event_webhook_url.clone())),
            ModelConfig {
                plan: config.plan_model.clone(),
                summary: config.summary_model.clone(),
            },
        )
    }
}

// =============================================================================
// Text generation
// =============================================================================

/// [`BaseAI`] over the chat-completions client. Without a key every call is a
/// `Config` error, so the server still starts.
pub struct GenAiAdapter {
    client: Option<GenAiClient>,
}

impl GenAiAdapter {
    pub fn new(api_key: Option<String>, base_url: &str) -> Self {
        Self {
            client: api_key.map(|key| GenAiClient::new(key).with_base_url(base_url)),
        }
    }
}

#[async_trait]
impl BaseAI for GenAiAdapter {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ApiError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ApiError::Config("GEMINI_API_KEY is not configured".into()))?;
        debug!(model, prompt_len = prompt.len(), "Generating text");
        Ok(client.generate_text(model, prompt).await?)
    }
}

// =============================================================================
// Streaming extraction
// =============================================================================

pub struct YellowcakeAdapter {
    client: Option<YellowcakeClient>,
}

impl YellowcakeAdapter {
    pub fn new(api_key: Option<String>, base_url: &str) -> Self {
        Self {
            client: api_key.map(|key| YellowcakeClient::new(key).with_base_url(base_url)),
        }
    }
}

#[async_trait]
impl BaseExtractor for YellowcakeAdapter {
    async fn open_stream(&self, url: &str, prompt: &str) -> Result<RelayStream, ApiError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ApiError::Config("YELLOWCAKE_API_KEY is not configured".into()))?;
        let stream = client.extract_stream(url, prompt).await?;
        Ok(stream.map(|chunk| chunk.map_err(ApiError::from)).boxed())
    }
}

// =============================================================================
// Webhook
// =============================================================================

pub struct HttpWebhook {
    client: reqwest::Client,
    url: Option<String>,
}

impl HttpWebhook {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl BaseWebhook for HttpWebhook {
    async fn dispatch(&self, payload: &serde_json::Value) -> anyhow::Result<Option<u16>> {
        let Some(url) = &self.url else {
            warn!("EVENT_WEBHOOK_URL not set; skipping webhook dispatch");
            return Ok(None);
        };

        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .context("Webhook request failed")?;
        Ok(Some(resp.status().as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_ai_key_is_config_error() {
        let adapter = GenAiAdapter::new(None, genai_client::GEMINI_OPENAI_BASE_URL);
        let result = tokio_test::block_on(adapter.generate("m", "p"));

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_missing_extractor_key_is_config_error() {
        let adapter = YellowcakeAdapter::new(None, yellowcake_client::BASE_URL);
        let result = tokio_test::block_on(adapter.open_stream("https://example.com", "p"));

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_unconfigured_webhook_is_skipped() {
        let webhook = HttpWebhook::new(None);
        let status = tokio_test::block_on(webhook.dispatch(&serde_json::json!({}))).unwrap();

        assert_eq!(status, None);
    }
}
