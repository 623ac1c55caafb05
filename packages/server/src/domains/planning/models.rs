use serde::{Deserialize, Serialize};

/// Body of `POST /review`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub food_type: Option<String>,
    pub comparison_metric: Option<String>,
    /// Only finite positive numbers count; anything else means the default
    pub max_words: Option<serde_json::Value>,
    pub event_name: Option<String>,
    pub restaurant_name: Option<String>,
    pub date_time: Option<String>,
    pub friend_message: Option<String>,
    pub invited: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub text: String,
    pub prompt: String,
    pub friend_message: Option<String>,
}
