use serde::Deserialize;

/// Query string of `GET /extract`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractQuery {
    pub url: Option<String>,
    pub prompt: Option<String>,
}
