//! Ask the text model for a quick list of restaurants.
//!
//! This is the fast half of the feed: a rough list the client can show while
//! the extraction stream fills in ratings and photos.

use serde_json::Value;
use tracing::{info, warn};

use super::models::{ListingRecord, SearchRequest, SearchResponse, DEFAULT_LOCATION};
use crate::common::json_extract::parse_array;
use crate::common::{ApiError, ApiResult};
use crate::kernel::ServerDeps;

pub const MAX_LISTINGS: usize = 10;

pub fn build_listing_prompt(query: &str, location: &str) -> String {
    format!(
        "List up to {max} real restaurants in {location} matching \"{query}\".

Return ONLY a JSON array. Each element must be an object with keys:
- name (string)
- address (string)
- description (one short sentence)
- cuisine (one or two words)

No markdown, no commentary.",
        max = MAX_LISTINGS,
    )
}

fn text(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Records without a name are dropped; other fields are optional.
pub fn to_listing(value: &Value) -> Option<ListingRecord> {
    Some(ListingRecord {
        name: text(value, "name")?,
        address: text(value, "address").unwrap_or_default(),
        description: text(value, "description"),
        cuisine: text(value, "cuisine"),
    })
}

pub fn parse_listings(raw: &str) -> ApiResult<Vec<ListingRecord>> {
    let values: Vec<Value> = parse_array(raw, "records").ok_or_else(|| {
        warn!(raw_len = raw.len(), "Listing reply has no JSON array");
        ApiError::parse("Model returned invalid JSON", raw)
    })?;

    Ok(values
        .iter()
        .filter_map(to_listing)
        .take(MAX_LISTINGS)
        .collect())
}

pub async fn search_restaurants(request: SearchRequest, deps: &ServerDeps) -> ApiResult<SearchResponse> {
    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::Validation("Search query required".into()))?;
    let location = request
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOCATION);

    let prompt = build_listing_prompt(query, location);
    let raw = deps.ai.generate(&deps.models.summary, &prompt).await?;
    let records = parse_listings(&raw)?;

    info!(query = %query, location = %location, count = records.len(), "Listed restaurants");
    Ok(SearchResponse { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{MockAI, TestDependencies};

    #[test]
    fn test_parse_fenced_array() {
        let raw = "```json\n[{\"name\":\"Nagi Sushi\",\"address\":\"1 Bank St\",\"cuisine\":\"Sushi\"}]\n```";

        let records = parse_listings(raw).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Nagi Sushi");
        assert_eq!(records[0].cuisine.as_deref(), Some("Sushi"));
        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_parse_array_inside_prose() {
        let raw = "Here you go:\n[{\"name\":\"A\"},{\"address\":\"no name\"},{\"name\":\"  \"}]\nEnjoy!";

        let records = parse_listings(raw).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, "");
    }

    #[test]
    fn test_parse_records_envelope() {
        let raw = "{\"records\": [{\"name\": \"B\", \"address\": \"2 Elgin\"}]}";
        assert_eq!(parse_listings(raw).unwrap()[0].address, "2 Elgin");
    }

    #[test]
    fn test_parse_failure_keeps_raw() {
        match parse_listings("nothing here").unwrap_err() {
            ApiError::Parse { raw, .. } => assert_eq!(raw, "nothing here"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_without_call() {
        let test_deps = TestDependencies::new();

        let err = search_restaurants(
            SearchRequest {
                query: Some("   ".into()),
                location: None,
            },
            &test_deps.server_deps(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(test_deps.ai.call_count(), 0);
    }

    #[tokio::test]
    async fn test_location_defaults_to_ottawa() {
        let test_deps = TestDependencies::new().mock_ai(MockAI::new().with_response("[]"));

        let response = search_restaurants(
            SearchRequest {
                query: Some("ramen".into()),
                location: None,
            },
            &test_deps.server_deps(),
        )
        .await
        .unwrap();

        assert!(response.records.is_empty());
        let prompt = test_deps.ai.last_prompt().unwrap();
        assert!(prompt.contains("restaurants in Ottawa matching \"ramen\""));
    }
}
