use serde::Serialize;

/// Body for `POST /v1/extract-stream`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractStreamRequest {
    /// Page to extract from
    pub url: String,
    /// Natural-language extraction instruction
    pub prompt: String,
}
