// Main entry point for API server

use anyhow::{Context, Result};
use server_core::{kernel::ServerDeps, server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LettuceEat API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; AI endpoints will return config errors");
    }
    if config.yellowcake_api_key.is_none() {
        tracing::warn!("YELLOWCAKE_API_KEY not set; /extract will return config errors");
    }
    tracing::info!(
        plan_model = %config.plan_model,
        summary_model = %config.summary_model,
        origins = ?config.allowed_origins,
        "Configuration loaded"
    );

    // Build application
    let deps = ServerDeps::from_config(&config);
    let app = build_app(deps, config.allowed_origins.clone());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
