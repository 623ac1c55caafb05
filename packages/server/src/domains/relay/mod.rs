//! Extraction stream relay (`GET /extract`).

pub mod activities;
pub mod models;

pub use models::ExtractQuery;
