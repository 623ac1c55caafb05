//! Restaurant category classification (`POST /restaurants/categorize`).

pub mod activities;
pub mod models;

pub use models::{CategorySource, ClassifyRequest, ClassifyResponse, CATEGORY_SET, FALLBACK_CATEGORY};
