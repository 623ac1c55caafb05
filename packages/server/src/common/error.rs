//! API error type shared by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A credential or setting the request needs is missing
    #[error("{0}")]
    Config(String),

    /// The request body or query is unusable; no upstream call was made
    #[error("{0}")]
    Validation(String),

    /// An upstream API failed, or answered without usable text
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        body: Option<String>,
    },

    /// The model answered, but not in the expected shape
    #[error("{message}")]
    Parse { message: String, raw: String },
}

impl ApiError {
    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError::Upstream {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub fn parse(message: impl Into<String>, raw: impl Into<String>) -> Self {
        ApiError::Parse {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// Stable machine-readable kind, also used in relay error frames.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Config(_) => "config_error",
            ApiError::Validation(_) => "validation_error",
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::Parse { .. } => "parse_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } | ApiError::Parse { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    /// Status reported by the upstream API, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ApiError::Upstream { status, .. } => *status,
            _ => None,
        }
    }

    /// Body reported by the upstream API, if any.
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            ApiError::Upstream { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

impl From<genai_client::GenAiError> for ApiError {
    fn from(e: genai_client::GenAiError) -> Self {
        use genai_client::GenAiError;
        match e {
            GenAiError::Config(message) => ApiError::Config(message),
            GenAiError::Api { status, message } => ApiError::Upstream {
                message: format!("Text generation failed with status {}", status),
                status: Some(status),
                body: Some(message),
            },
            other => ApiError::upstream(other.to_string()),
        }
    }
}

impl From<yellowcake_client::YellowcakeError> for ApiError {
    fn from(e: yellowcake_client::YellowcakeError) -> Self {
        use yellowcake_client::YellowcakeError;
        match e {
            YellowcakeError::Config(message) => ApiError::Config(message),
            YellowcakeError::Api { status, message } => ApiError::Upstream {
                message: format!("Extraction failed with status {}", status),
                status: Some(status),
                body: Some(message),
            },
            other => ApiError::upstream(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Config(_) => tracing::error!(error = %self, "Request failed: configuration"),
            ApiError::Validation(_) => tracing::debug!(error = %self, "Request rejected"),
            _ => tracing::warn!(kind = self.kind(), error = %self, "Upstream request failed"),
        }

        let retryable = matches!(self, ApiError::Upstream { .. } | ApiError::Parse { .. });
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            hint: retryable.then_some("Please try again in a moment."),
            status: self.upstream_status(),
            body: self.upstream_body(),
            raw: match &self {
                ApiError::Parse { raw, .. } => Some(raw.as_str()),
                _ => None,
            },
        };

        (self.status_code(), Json(body)).into_response()
    }
}
