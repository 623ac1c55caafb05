// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;

use super::deps::{ModelConfig, ServerDeps};
use super::traits::{BaseAI, BaseExtractor, BaseWebhook, RelayStream};
use crate::common::ApiError;

// =============================================================================
// Mock AI
// =============================================================================

#[derive(Debug, Clone)]
pub struct AiCall {
    pub model: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Upstream { status: u16, body: String },
    Missing,
}

/// Replies are served in queue order; an empty queue answers "Mock response".
pub struct MockAI {
    replies: Arc<Mutex<Vec<MockReply>>>,
    calls: Arc<Mutex<Vec<AiCall>>>,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, text: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply::Text(text.to_string()));
        self
    }

    /// Queue an upstream failure
    pub fn with_failure(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply::Upstream {
            status,
            body: body.to_string(),
        });
        self
    }

    /// Queue a missing-credential failure
    pub fn with_missing_key(self) -> Self {
        self.replies.lock().unwrap().push(MockReply::Missing);
        self
    }

    pub fn calls(&self) -> Vec<AiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|c| c.prompt.clone())
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ApiError> {
        self.calls.lock().unwrap().push(AiCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
        });

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                MockReply::Text("Mock response".to_string())
            } else {
                replies.remove(0)
            }
        };

        match reply {
            MockReply::Text(text) if text.trim().is_empty() => {
                Err(ApiError::upstream("Model returned an empty reply"))
            }
            MockReply::Text(text) => Ok(text),
            MockReply::Upstream { status, body } => Err(ApiError::Upstream {
                message: format!("Text generation failed with status {}", status),
                status: Some(status),
                body: Some(body),
            }),
            MockReply::Missing => Err(ApiError::Config("GEMINI_API_KEY is not configured".into())),
        }
    }
}

// =============================================================================
// Mock Extractor
// =============================================================================

#[derive(Debug, Clone)]
pub struct ExtractCall {
    pub url: String,
    pub prompt: String,
}

pub struct MockExtractor {
    chunks: Vec<String>,
    mid_stream_error: Option<String>,
    open_error: Option<(u16, String)>,
    calls: Arc<Mutex<Vec<ExtractCall>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            chunks: Vec::new(),
            mid_stream_error: None,
            open_error: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Raw bytes relayed in order
    pub fn with_chunk(mut self, chunk: &str) -> Self {
        self.chunks.push(chunk.to_string());
        self
    }

    /// Fail after the queued chunks
    pub fn with_mid_stream_error(mut self, message: &str) -> Self {
        self.mid_stream_error = Some(message.to_string());
        self
    }

    /// Reject the request before any byte is sent
    pub fn with_open_error(mut self, status: u16, body: &str) -> Self {
        self.open_error = Some((status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ExtractCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseExtractor for MockExtractor {
    async fn open_stream(&self, url: &str, prompt: &str) -> Result<RelayStream, ApiError> {
        self.calls.lock().unwrap().push(ExtractCall {
            url: url.to_string(),
            prompt: prompt.to_string(),
        });

        if let Some((status, body)) = &self.open_error {
            return Err(ApiError::Upstream {
                message: format!("Extraction failed with status {}", status),
                status: Some(*status),
                body: Some(body.clone()),
            });
        }

        let mut items: Vec<Result<Bytes, ApiError>> = self
            .chunks
            .iter()
            .map(|c| Ok(Bytes::from(c.clone())))
            .collect();
        if let Some(message) = &self.mid_stream_error {
            items.push(Err(ApiError::upstream(message.clone())));
        }
        Ok(futures::stream::iter(items).boxed())
    }
}

// =============================================================================
// Mock Webhook
// =============================================================================

pub struct MockWebhook {
    payloads: Arc<Mutex<Vec<serde_json::Value>>>,
    fail: bool,
}

impl MockWebhook {
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Make every dispatch fail after recording the payload
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn payloads(&self) -> Vec<serde_json::Value> {
        self.payloads.lock().unwrap().clone()
    }
}

impl Default for MockWebhook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseWebhook for MockWebhook {
    async fn dispatch(&self, payload: &serde_json::Value) -> anyhow::Result<Option<u16>> {
        self.payloads.lock().unwrap().push(payload.clone());
        if self.fail {
            anyhow::bail!("webhook unreachable");
        }
        Ok(Some(200))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub ai: Arc<MockAI>,
    pub extractor: Arc<MockExtractor>,
    pub webhook: Arc<MockWebhook>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            ai: Arc::new(MockAI::new()),
            extractor: Arc::new(MockExtractor::new()),
            webhook: Arc::new(MockWebhook::new()),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Arc::new(ai);
        self
    }

    /// Set a mock extractor
    pub fn mock_extractor(mut self, extractor: MockExtractor) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    /// Set a mock webhook
    pub fn mock_webhook(mut self, webhook: MockWebhook) -> Self {
        self.webhook = Arc::new(webhook);
        self
    }

    /// Build ServerDeps sharing these mocks, so tests can inspect calls afterwards
    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.ai.clone(),
            self.extractor.clone(),
            self.webhook.clone(),
            ModelConfig::default(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
