//! Byte relay between the extraction API and the browser.
//!
//! Upstream frames pass through untouched. Once the response has started, a
//! failure can only be reported in-band, as a final `event: error` frame.

use std::convert::Infallible;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde_json::json;
use tracing::{debug, info, warn};
use yellowcake_client::SseEvent;

use super::models::ExtractQuery;
use crate::common::{ApiError, ApiResult};
use crate::kernel::{RelayStream, ServerDeps};

pub const ERROR_EVENT: &str = "error";

/// Required, non-blank parameters and an absolute http(s) target.
pub fn validate_query(query: &ExtractQuery) -> ApiResult<(String, String)> {
    let non_blank = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    let (Some(url), Some(prompt)) = (non_blank(&query.url), non_blank(&query.prompt)) else {
        return Err(ApiError::Validation("Missing url or prompt".into()));
    };

    match url::Url::parse(&url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok((url, prompt)),
        _ => Err(ApiError::Validation(format!("Invalid url: {}", url))),
    }
}

/// Terminal frame sent when the upstream fails mid-stream.
pub fn error_frame(error: &ApiError) -> String {
    let data = json!({
        "kind": error.kind(),
        "message": error.to_string(),
        "status": error.upstream_status(),
        "body": error.upstream_body(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    SseEvent::new(ERROR_EVENT, data.to_string()).encode()
}

/// Open the upstream stream. Errors here happen before any byte is written,
/// so the caller can still answer with a plain error response.
pub async fn open_relay(query: ExtractQuery, deps: &ServerDeps) -> ApiResult<RelayStream> {
    let (url, prompt) = validate_query(&query)?;
    let stream = deps.extractor.open_stream(&url, &prompt).await?;
    info!(url = %url, prompt_len = prompt.len(), "Relaying extraction stream");
    Ok(stream)
}

/// Relay bytes verbatim; the first error becomes an error frame and ends the body.
pub fn relay_body(mut upstream: RelayStream) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
    async_stream::stream! {
        let mut relayed = 0usize;
        let mut ends_with_newline = true;

        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    relayed += chunk.len();
                    ends_with_newline = chunk.ends_with(b"\n");
                    yield Ok(chunk);
                }
                Err(e) => {
                    warn!(error = %e, relayed, "Extraction stream failed after commit");
                    let mut frame = String::new();
                    if !ends_with_newline {
                        frame.push('\n');
                    }
                    frame.push_str(&error_frame(&e));
                    yield Ok(Bytes::from(frame));
                    return;
                }
            }
        }

        debug!(relayed, "Extraction stream closed");
    }
}
