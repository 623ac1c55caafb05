//! Record producers feeding the reconciler.
//!
//! Two shapes: a fast listing that answers with one batch, and a slow
//! extraction stream that yields records one at a time. The HTTP
//! implementations talk to the LettuceEat server (`/restaurants/search` and
//! the `/extract` relay).

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use yellowcake_client::SseEventStream;

use crate::error::{Result, SyncError};
use crate::record::CandidateRecord;

pub const DEFAULT_LOCATION: &str = "Ottawa";

/// Incremental stream of candidates. Dropping it closes the connection.
pub type CandidateStream = BoxStream<'static, Result<CandidateRecord>>;

/// Produces a complete batch for a query in one call.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listing(&self, query: &str) -> Result<Vec<CandidateRecord>>;
}

/// Opens an incremental record stream for a query.
pub trait StreamSource: Send + Sync {
    fn open_stream(&self, query: &str) -> CandidateStream;
}

#[derive(Debug, Serialize)]
struct ListingRequest<'a> {
    query: &'a str,
    location: &'a str,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    records: Vec<ListingRecord>,
}

#[derive(Debug, Deserialize)]
struct ListingRecord {
    name: Option<String>,
    address: Option<String>,
    description: Option<String>,
    cuisine: Option<String>,
}

impl From<ListingRecord> for CandidateRecord {
    fn from(r: ListingRecord) -> Self {
        CandidateRecord {
            name: r.name.filter(|s| !s.trim().is_empty()),
            address: r.address.filter(|s| !s.trim().is_empty()),
            category: r.cuisine.filter(|s| !s.trim().is_empty()),
            overview: r.description.filter(|s| !s.trim().is_empty()),
            ..Default::default()
        }
    }
}

/// Fast producer backed by `POST {base}/restaurants/search`.
#[derive(Clone)]
pub struct HttpListingSource {
    client: reqwest::Client,
    base_url: String,
    location: String,
}

impl HttpListingSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_listing(&self, query: &str) -> Result<Vec<CandidateRecord>> {
        let resp = self
            .client
            .post(format!("{}/restaurants/search", self.base_url))
            .json(&ListingRequest {
                query,
                location: &self.location,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Upstream {
                message: body,
                status: Some(status.as_u16()),
            });
        }

        let listing: ListingResponse = resp
            .json()
            .await
            .map_err(|e| SyncError::Parse(e.to_string()))?;
        info!(query, count = listing.records.len(), "Fast listing received");

        Ok(listing.records.into_iter().map(CandidateRecord::from).collect())
    }
}

/// Google Maps search page handed to the extractor.
pub fn maps_search_url(query: &str, location: &str) -> String {
    let words: Vec<&str> = query.split_whitespace().collect();
    format!(
        "https://www.google.com/maps/search/{}+in+{}/",
        words.join("+"),
        location.trim().to_lowercase()
    )
}

/// Extraction instruction for a query.
pub fn extraction_prompt(query: &str, location: &str) -> String {
    format!(
        "Extract restaurant details for {} in {}: name, address, rating, price, cuisine, photos",
        query.trim(),
        location.trim()
    )
}

/// Slow producer backed by the server's `GET {base}/extract` relay.
#[derive(Clone)]
pub struct HttpStreamSource {
    client: reqwest::Client,
    base_url: String,
    location: String,
}

impl HttpStreamSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    fn relay_url(&self, query: &str) -> Result<url::Url> {
        url::Url::parse_with_params(
            &format!("{}/extract", self.base_url),
            &[
                ("url", maps_search_url(query, &self.location)),
                ("prompt", extraction_prompt(query, &self.location)),
            ],
        )
        .map_err(|e| SyncError::Parse(format!("invalid relay URL: {}", e)))
    }
}

impl StreamSource for HttpStreamSource {
    fn open_stream(&self, query: &str) -> CandidateStream {
        let client = self.client.clone();
        let url = self.relay_url(query);
        let query = query.to_string();

        let stream = async_stream::stream! {
            let url = match url {
                Ok(url) => url,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let resp = match client
                .get(url)
                .header("Accept", "text/event-stream")
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    yield Err(SyncError::from(e));
                    return;
                }
            };

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                yield Err(SyncError::Upstream { message: body, status: Some(status.as_u16()) });
                return;
            }

            let bytes = resp
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| yellowcake_client::YellowcakeError::Http(e.to_string())));
            let mut events = SseEventStream::new(bytes);

            while let Some(event) = events.next().await {
                let event = match event {
                    Ok(event) => event,
                    Err(e) => {
                        yield Err(SyncError::from(e));
                        return;
                    }
                };

                match event.event.as_str() {
                    "chunk" => {
                        let candidate = serde_json::from_str::<serde_json::Value>(&event.data)
                            .ok()
                            .and_then(|value| CandidateRecord::from_json(&value));
                        match candidate {
                            Some(candidate) => {
                                yield Ok(candidate);
                            }
                            None => debug!(query = %query, data = %event.data, "Skipping unreadable chunk"),
                        }
                    }
                    "progress" => debug!(query = %query, progress = %event.data, "Extraction progress"),
                    "error" => {
                        warn!(query = %query, data = %event.data, "Extraction stream reported an error");
                        yield Err(SyncError::upstream(event.data));
                        return;
                    }
                    "done" | "complete" => return,
                    other => debug!(query = %query, event = other, "Ignoring stream event"),
                }
            }
        };

        stream.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_search_url() {
        assert_eq!(
            maps_search_url("thai  food", "Ottawa"),
            "https://www.google.com/maps/search/thai+food+in+ottawa/"
        );
    }

    #[test]
    fn test_extraction_prompt() {
        assert_eq!(
            extraction_prompt("sushi", "Ottawa"),
            "Extract restaurant details for sushi in Ottawa: name, address, rating, price, cuisine, photos"
        );
    }

    #[test]
    fn test_relay_url_encodes_params() {
        let source = HttpStreamSource::new("http://localhost:3000/");
        let url = source.relay_url("sushi").unwrap();

        assert_eq!(url.path(), "/extract");
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(params[0].0, "url");
        assert_eq!(params[0].1, "https://www.google.com/maps/search/sushi+in+ottawa/");
        assert_eq!(params[1].0, "prompt");
    }

    #[test]
    fn test_listing_record_conversion_drops_blanks() {
        let record: ListingRecord = serde_json::from_value(serde_json::json!({
            "name": "Spice Avenue",
            "address": " ",
            "cuisine": "Indian"
        }))
        .unwrap();
        let candidate = CandidateRecord::from(record);

        assert_eq!(candidate.name.as_deref(), Some("Spice Avenue"));
        assert!(candidate.address.is_none());
        assert_eq!(candidate.category.as_deref(), Some("Indian"));
    }
}
