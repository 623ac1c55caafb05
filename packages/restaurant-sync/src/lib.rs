//! Restaurant feed synchronization.
//!
//! Keeps a de-duplicated restaurant list for a search query in step with two
//! producers of different speed, backed by a TTL cache:
//!
//! - [`record`]: records, candidates, ids and query normalization
//! - [`merge`]: id-keyed merge with field-level preferences
//! - [`cache`] / [`store`]: TTL cache over a pluggable key-value store
//! - [`producers`]: fast listing and slow stream sources (HTTP implementations)
//! - [`reconciler`]: the per-query state machine
//! - [`samples`] / [`images`]: fallback data and image selection
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use restaurant_sync::*;
//!
//! let cache = RestaurantCache::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock));
//! let reconciler = Reconciler::new(
//!     cache,
//!     Arc::new(HttpListingSource::new("http://localhost:3000")),
//!     Arc::new(HttpStreamSource::new("http://localhost:3000")),
//!     ReconcilerConfig::default(),
//! );
//! let mut feed = reconciler.subscribe();
//! reconciler.reconcile("sushi");
//! while feed.changed().await.is_ok() {
//!     let snapshot = feed.borrow_and_update().clone();
//!     if snapshot.is_settled() {
//!         break;
//!     }
//! }
//! ```

pub mod cache;
pub mod error;
pub mod images;
pub mod merge;
pub mod producers;
pub mod reconciler;
pub mod record;
pub mod samples;
pub mod store;
pub mod testing;

pub use cache::{CacheEntry, CacheLookup, Clock, RestaurantCache, SystemClock};
pub use error::{Result, SyncError};
pub use merge::{merge_candidate, MergeOutcome};
pub use producers::{
    CandidateStream, HttpListingSource, HttpStreamSource, ListingSource, StreamSource,
};
pub use reconciler::{FeedSnapshot, ReconcileHandle, ReconcileState, Reconciler, ReconcilerConfig};
pub use record::{normalize_query, record_id, CandidateRecord, PriceRange, RestaurantRecord};
pub use store::{FileStore, KeyValueStore, MemoryStore};
