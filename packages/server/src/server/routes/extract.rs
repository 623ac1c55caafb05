use axum::{
    body::Body,
    extract::{Extension, Query},
    http::{header, HeaderValue},
    response::Response,
};

use crate::common::ApiResult;
use crate::domains::relay::activities::{open_relay, relay_body};
use crate::domains::relay::ExtractQuery;
use crate::server::app::AppState;

/// Relay an extraction stream as server-sent events.
///
/// The upstream is opened before the response is built, so a rejected
/// request still gets an ordinary JSON error.
pub async fn extract_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ExtractQuery>,
) -> ApiResult<Response> {
    let upstream = open_relay(query, &state.deps).await?;

    let mut response = Response::new(Body::from_stream(relay_body(upstream)));
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    Ok(response)
}
