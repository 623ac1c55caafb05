use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Gemini model used for meetup plans
pub const DEFAULT_PLAN_MODEL: &str = "gemini-3-flash-preview";

/// Faster Gemini model used for summaries, classification and listings
pub const DEFAULT_SUMMARY_MODEL: &str = "gemini-2.5-flash";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Absent keys are reported per request, not at startup
    pub gemini_api_key: Option<String>,
    pub ai_base_url: String,
    pub plan_model: String,
    pub summary_model: String,
    pub yellowcake_api_key: Option<String>,
    pub yellowcake_base_url: String,
    pub event_webhook_url: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            ai_base_url: env::var("AI_BASE_URL")
                .unwrap_or_else(|_| genai_client::GEMINI_OPENAI_BASE_URL.to_string()),
            plan_model: env::var("PLAN_MODEL").unwrap_or_else(|_| DEFAULT_PLAN_MODEL.to_string()),
            summary_model: env::var("SUMMARY_MODEL")
                .unwrap_or_else(|_| DEFAULT_SUMMARY_MODEL.to_string()),
            yellowcake_api_key: non_empty_var("YELLOWCAKE_API_KEY"),
            yellowcake_base_url: env::var("YELLOWCAKE_BASE_URL")
                .unwrap_or_else(|_| yellowcake_client::BASE_URL.to_string()),
            event_webhook_url: non_empty_var("EVENT_WEBHOOK_URL"),
            allowed_origins: parse_origins(
                &env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            ),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
