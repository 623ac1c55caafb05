// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Prompt building and reply parsing live in the domains that use them.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseExtractor)

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::common::ApiError;

// =============================================================================
// AI Trait (Infrastructure - text generation)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Send one prompt to `model` and return the reply text.
    ///
    /// Single attempt. Blank replies are an `Upstream` error.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ApiError>;
}

// =============================================================================
// Extractor Trait (Infrastructure - streaming page extraction)
// =============================================================================

/// Upstream bytes, already framed as server-sent events.
pub type RelayStream = BoxStream<'static, Result<Bytes, ApiError>>;

#[async_trait]
pub trait BaseExtractor: Send + Sync {
    /// Open an extraction stream.
    ///
    /// Resolves once the upstream has accepted the request; failures after
    /// that arrive as stream items.
    async fn open_stream(&self, url: &str, prompt: &str) -> Result<RelayStream, ApiError>;
}

// =============================================================================
// Webhook Trait (Infrastructure - outbound automation)
// =============================================================================

#[async_trait]
pub trait BaseWebhook: Send + Sync {
    /// Deliver one payload. Returns the HTTP status, or `None` when delivery
    /// is not configured.
    async fn dispatch(&self, payload: &serde_json::Value) -> anyhow::Result<Option<u16>>;
}
