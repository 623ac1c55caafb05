// Common types and utilities shared across the application

pub mod error;
pub mod json_extract;

pub use error::{ApiError, ApiResult};
