//! Review summarization (`POST /reviews/summarize`).

pub mod activities;
pub mod models;

pub use models::{SentimentSummary, SummarizeRequest};
