use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "Ottawa";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub location: Option<String>,
}

/// One listing row as the model returns it. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub records: Vec<ListingRecord>,
}
