//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    availability_handler, categorize_handler, create_event_handler, extract_handler,
    health_handler, plan_handler, search_handler, summarize_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, allowed_origins: Vec<String>) -> Router {
    let app_state = AppState {
        deps: Arc::new(deps),
    };

    Router::new()
        .route("/health", get(health_handler))
        // AI proxy
        .route("/review", post(plan_handler))
        .route("/reviews/summarize", post(summarize_handler))
        .route("/restaurants/categorize", post(categorize_handler))
        .route("/restaurants/search", post(search_handler))
        // Extraction relay (SSE)
        .route("/extract", get(extract_handler))
        // Meetups
        .route("/events", post(create_event_handler))
        .route("/availability/overlap", post(availability_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors_layer(&allowed_origins))
        .layer(TraceLayer::new_for_http())
}
