use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    pub emails: Vec<String>,
    pub event_name: Option<String>,
    pub restaurant: Option<String>,
    pub restaurant_category: Option<String>,
    pub date_time: Option<String>,
    pub friend_message: Option<String>,
    /// Plan text from `POST /review`, forwarded as-is
    pub output: Option<String>,
    pub food_type: Option<String>,
    pub comparison_metric: Option<String>,
    pub max_words: Option<serde_json::Value>,
}

/// Body posted to the automation webhook. Absent values are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePayload {
    pub emails: Vec<String>,
    pub event_name: String,
    pub restaurant: Option<String>,
    pub date_time: String,
    pub friend_message: Option<String>,
    pub output: Option<String>,
    pub food_type: String,
    pub comparison_metric: Option<String>,
    pub max_words: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreated {
    pub event_id: Uuid,
    pub created: bool,
    pub message: String,
}
