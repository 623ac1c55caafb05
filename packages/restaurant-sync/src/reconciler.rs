//! Per-query reconciliation of cached and progressively arriving records.
//!
//! Each call to [`Reconciler::reconcile`] starts a new generation. The run
//! reads the cache, then (unless the entry is fresh) drives the fast listing
//! and the slow stream concurrently, merging every arrival into one list.
//! Subscribers see each intermediate list through a `watch` channel.
//!
//! Publishing and cache writes are committed under the generation lock, so a
//! superseded run can never overwrite the state of the query that replaced it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::StreamExt;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheLookup, RestaurantCache};
use crate::merge::merge_candidate;
use crate::producers::{ListingSource, StreamSource};
use crate::record::{normalize_query, CandidateRecord, RestaurantRecord};
use crate::samples;

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Entries younger than this are served without any network call
    pub fresh_window: Duration,
    /// How long to wait for a first record before showing samples
    pub no_data_timeout: Duration,
    /// Cache writes within this window coalesce into one
    pub debounce: Duration,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            fresh_window: Duration::from_secs(5 * 60),
            no_data_timeout: Duration::from_secs(120),
            debounce: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconcileState {
    Idle,
    CheckCache,
    CacheFreshDone,
    CacheStaleRevalidating,
    CacheAbsentFetching,
    Merging,
    Settled,
}

/// What subscribers see after every step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub generation: u64,
    pub query: String,
    pub restaurants: Vec<RestaurantRecord>,
    pub state: ReconcileState,
    /// Advisory: the list is built-in sample data, not live results
    pub showing_sample_data: bool,
}

impl FeedSnapshot {
    fn idle() -> Self {
        Self {
            generation: 0,
            query: String::new(),
            restaurants: Vec::new(),
            state: ReconcileState::Idle,
            showing_sample_data: false,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state == ReconcileState::Settled
    }
}

struct Shared {
    generation: Mutex<u64>,
    tx: watch::Sender<FeedSnapshot>,
}

impl Shared {
    fn lock_generation(&self) -> MutexGuard<'_, u64> {
        self.generation.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new generation and reset the feed to an idle snapshot.
    fn begin(&self, query: &str) -> u64 {
        let mut current = self.lock_generation();
        *current += 1;
        let generation = *current;
        self.tx.send_replace(FeedSnapshot {
            generation,
            query: query.to_string(),
            ..FeedSnapshot::idle()
        });
        generation
    }

    /// Run `f` only while `generation` is still current.
    fn commit<R>(&self, generation: u64, f: impl FnOnce(&watch::Sender<FeedSnapshot>) -> R) -> Option<R> {
        let current = self.lock_generation();
        if *current != generation {
            return None;
        }
        Some(f(&self.tx))
    }
}

struct ActiveRun {
    generation: u64,
    cancel: CancellationToken,
}

/// Drives one query at a time; a new query supersedes the previous one.
pub struct Reconciler {
    shared: Arc<Shared>,
    cache: RestaurantCache,
    listing: Arc<dyn ListingSource>,
    stream: Arc<dyn StreamSource>,
    config: ReconcilerConfig,
    active: Mutex<Option<ActiveRun>>,
}

/// Handle to one reconciliation run.
pub struct ReconcileHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl ReconcileHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the run to settle or be superseded.
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            warn!(generation = self.generation, error = %e, "Reconcile task ended abnormally");
        }
    }
}

impl Reconciler {
    pub fn new(
        cache: RestaurantCache,
        listing: Arc<dyn ListingSource>,
        stream: Arc<dyn StreamSource>,
        mut config: ReconcilerConfig,
    ) -> Self {
        if config.fresh_window > cache.expiry() {
            warn!(
                fresh_window = ?config.fresh_window,
                expiry = ?cache.expiry(),
                "Fresh window exceeds cache expiry; clamping"
            );
            config.fresh_window = cache.expiry();
        }

        let (tx, _rx) = watch::channel(FeedSnapshot::idle());
        Self {
            shared: Arc::new(Shared {
                generation: Mutex::new(0),
                tx,
            }),
            cache,
            listing,
            stream,
            config,
            active: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedSnapshot> {
        self.shared.tx.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.shared.tx.borrow().clone()
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reconcile `query`, cancelling whatever run is in flight.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn reconcile(&self, query: &str) -> ReconcileHandle {
        let query = normalize_query(query);
        let mut active = self.lock_active();

        if let Some(previous) = active.take() {
            debug!(generation = previous.generation, "Superseding in-flight reconcile");
            previous.cancel.cancel();
        }

        let generation = self.shared.begin(&query);
        let cancel = CancellationToken::new();
        let run = QueryRun {
            generation,
            query,
            shared: self.shared.clone(),
            cache: self.cache.clone(),
            listing: self.listing.clone(),
            stream: self.stream.clone(),
            config: self.config.clone(),
            cancel: cancel.clone(),
        };

        let task = tokio::spawn(run.run());
        *active = Some(ActiveRun { generation, cancel });

        ReconcileHandle { generation, task }
    }

    /// Cancel the in-flight run, if any, leaving the feed idle.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock_active().take() {
            previous.cancel.cancel();
            self.shared.begin("");
        }
    }
}

impl Drop for Reconciler {
    fn drop(&mut self) {
        if let Some(active) = self.lock_active().take() {
            active.cancel.cancel();
        }
    }
}

/// Why a fetch gave up waiting.
#[derive(Debug, Clone, Copy)]
enum FallbackReason {
    Timeout,
    StreamFailed,
}

struct QueryRun {
    generation: u64,
    query: String,
    shared: Arc<Shared>,
    cache: RestaurantCache,
    listing: Arc<dyn ListingSource>,
    stream: Arc<dyn StreamSource>,
    config: ReconcilerConfig,
    cancel: CancellationToken,
}

impl QueryRun {
    /// Publish a snapshot for this generation. `false` once superseded.
    fn publish(&self, restaurants: &[RestaurantRecord], state: ReconcileState, sample: bool) -> bool {
        self.shared
            .commit(self.generation, |tx| {
                tx.send_modify(|snap| {
                    snap.restaurants = restaurants.to_vec();
                    snap.state = state;
                    snap.showing_sample_data = sample;
                })
            })
            .is_some()
    }

    fn write_cache(&self, restaurants: &[RestaurantRecord]) {
        let written = self
            .shared
            .commit(self.generation, |_| self.cache.put(&self.query, restaurants));
        match written {
            Some(Ok(())) => debug!(query = %self.query, count = restaurants.len(), "Cache updated"),
            Some(Err(e)) => warn!(query = %self.query, error = %e, "Cache write failed"),
            None => debug!(query = %self.query, "Skipping cache write for superseded query"),
        }
    }

    async fn run(self) {
        if !self.publish(&[], ReconcileState::CheckCache, false) {
            return;
        }

        let list = match self.cache.lookup(&self.query, self.config.fresh_window) {
            CacheLookup::Fresh(entry) => {
                info!(query = %self.query, count = entry.restaurants.len(), "Serving fresh cache");
                self.publish(&entry.restaurants, ReconcileState::CacheFreshDone, false);
                self.publish(&entry.restaurants, ReconcileState::Settled, false);
                return;
            }
            CacheLookup::Stale(entry) => {
                info!(query = %self.query, count = entry.restaurants.len(), "Revalidating stale cache");
                if !self.publish(&entry.restaurants, ReconcileState::CacheStaleRevalidating, false) {
                    return;
                }
                entry.restaurants
            }
            CacheLookup::Absent => {
                info!(query = %self.query, "Cache miss; fetching");
                if !self.publish(&[], ReconcileState::CacheAbsentFetching, false) {
                    return;
                }
                Vec::new()
            }
        };

        self.fetch(list).await;
    }

    fn merge(&self, list: &mut Vec<RestaurantRecord>, candidate: CandidateRecord) -> bool {
        let outcome = merge_candidate(list, candidate);
        debug!(query = %self.query, ?outcome, total = list.len(), "Merged record");
        self.publish(list, ReconcileState::Merging, false)
    }

    async fn fetch(&self, mut list: Vec<RestaurantRecord>) {
        let listing_source = self.listing.clone();
        let listing_query = self.query.clone();
        let mut listing = Box::pin(async move { listing_source.fetch_listing(&listing_query).await });
        let mut records = self.stream.open_stream(&self.query);

        let timeout = tokio::time::sleep(self.config.no_data_timeout);
        tokio::pin!(timeout);
        let debounce = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(debounce);

        let mut merged = 0usize;
        let mut listing_done = false;
        let mut stream_done = false;
        let mut write_pending = false;

        loop {
            // Two empty producers are not yet a result; the timeout decides.
            if listing_done && stream_done && (merged > 0 || !list.is_empty()) {
                break;
            }

            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    debug!(query = %self.query, "Reconcile cancelled");
                    return;
                }

                result = &mut listing, if !listing_done => {
                    listing_done = true;
                    match result {
                        Ok(batch) => {
                            debug!(query = %self.query, count = batch.len(), "Fast listing finished");
                            for candidate in batch {
                                if !self.merge(&mut list, candidate) {
                                    return;
                                }
                                merged += 1;
                            }
                        }
                        Err(e) => debug!(query = %self.query, error = %e, "Fast listing failed; ignoring"),
                    }
                    // The window opens at the first merge of a burst and is not extended
                    if merged > 0 && !write_pending {
                        write_pending = true;
                        debounce.as_mut().reset(Instant::now() + self.config.debounce);
                    }
                }

                item = records.next(), if !stream_done => match item {
                    Some(Ok(candidate)) => {
                        if !self.merge(&mut list, candidate) {
                            return;
                        }
                        merged += 1;
                        if !write_pending {
                            write_pending = true;
                            debounce.as_mut().reset(Instant::now() + self.config.debounce);
                        }
                    }
                    Some(Err(e)) => {
                        stream_done = true;
                        if merged == 0 {
                            warn!(query = %self.query, error = %e, "Stream failed before any record");
                            self.fall_back(list, FallbackReason::StreamFailed);
                            return;
                        }
                        info!(query = %self.query, error = %e, merged, "Stream ended with error; keeping results");
                    }
                    None => {
                        debug!(query = %self.query, merged, "Stream finished");
                        stream_done = true;
                    }
                },

                () = &mut debounce, if write_pending => {
                    write_pending = false;
                    self.write_cache(&list);
                }

                () = &mut timeout, if merged == 0 => {
                    self.fall_back(list, FallbackReason::Timeout);
                    return;
                }
            }
        }

        if write_pending {
            self.write_cache(&list);
        }
        info!(query = %self.query, count = list.len(), merged, "Reconcile settled");
        self.publish(&list, ReconcileState::Settled, false);
    }

    /// Settle without live records.
    ///
    /// A provisional list from a stale cache entry is kept as is; only an
    /// empty list is replaced by samples. Samples are never cached.
    fn fall_back(&self, list: Vec<RestaurantRecord>, reason: FallbackReason) {
        if !list.is_empty() {
            info!(query = %self.query, ?reason, count = list.len(), "No live records; keeping cached list");
            self.publish(&list, ReconcileState::Settled, false);
            return;
        }

        let samples = samples::fallback_for_query(&self.query);
        warn!(query = %self.query, ?reason, count = samples.len(), "No live records; showing sample data");
        self.publish(&samples, ReconcileState::Settled, true);
    }
}
