use serde::{Deserialize, Serialize};

/// Body of `POST /reviews/summarize`.
///
/// Review lists are taken as raw JSON values; non-string entries are dropped
/// during cleaning rather than rejecting the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeRequest {
    pub restaurant_name: Option<String>,
    pub positive_reviews: Option<Vec<serde_json::Value>>,
    pub negative_reviews: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub positive_summary: String,
    pub negative_summary: String,
}
