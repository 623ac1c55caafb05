use serde::{Deserialize, Serialize};

/// Labels the classifier may return.
pub const CATEGORY_SET: [&str; 13] = [
    "Burgers",
    "Sushi",
    "Italian",
    "Pizza",
    "Thai",
    "Japanese",
    "Chinese",
    "Indian",
    "Mexican",
    "Mediterranean",
    "Seafood",
    "American",
    "Other",
];

pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyRequest {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub category: String,
    pub source: CategorySource,
}

impl ClassifyResponse {
    pub fn fallback(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            source: CategorySource::Fallback,
        }
    }
}
