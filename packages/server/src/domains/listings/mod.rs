//! Fast restaurant listing (`POST /restaurants/search`).

pub mod activities;
pub mod models;

pub use models::{ListingRecord, SearchRequest, SearchResponse, DEFAULT_LOCATION};
