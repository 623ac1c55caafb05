//! Scriptable clock and producers for exercising the reconciler.
//!
//! Scripts are keyed by normalized query, so one pair of sources can serve
//! several queries with different timing. Delays use `tokio::time`, which
//! makes them instant under a paused test clock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;

use crate::cache::Clock;
use crate::error::{Result, SyncError};
use crate::producers::{CandidateStream, ListingSource, StreamSource};
use crate::record::{normalize_query, CandidateRecord};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(now_ms),
        }
    }

    pub fn set_ms(&self, now_ms: i64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum ListingScript {
    Records {
        delay: Duration,
        records: Vec<CandidateRecord>,
    },
    Fail(String),
    Hang,
}

/// Fast producer answering from per-query scripts. Unscripted queries get an
/// empty batch.
#[derive(Default)]
pub struct ScriptedListing {
    scripts: Mutex<HashMap<String, ListingScript>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, query: &str, script: ListingScript) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(normalize_query(query), script);
        }
        self
    }

    pub fn records(self, query: &str, records: Vec<CandidateRecord>) -> Self {
        self.on(
            query,
            ListingScript::Records {
                delay: Duration::ZERO,
                records,
            },
        )
    }

    /// Queries fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ListingSource for ScriptedListing {
    async fn fetch_listing(&self, query: &str) -> Result<Vec<CandidateRecord>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.to_string());
        }
        let script = self
            .scripts
            .lock()
            .ok()
            .and_then(|s| s.get(&normalize_query(query)).cloned());

        match script {
            None => Ok(Vec::new()),
            Some(ListingScript::Records { delay, records }) => {
                tokio::time::sleep(delay).await;
                Ok(records)
            }
            Some(ListingScript::Fail(message)) => Err(SyncError::upstream(message)),
            Some(ListingScript::Hang) => std::future::pending().await,
        }
    }
}

#[derive(Debug, Clone)]
pub enum StreamStep {
    Record(CandidateRecord),
    Delay(Duration),
    Error(String),
    /// Stay open without yielding anything further
    Hang,
}

/// Records the query when a stream body is dropped, finished or not.
struct CloseGuard {
    query: String,
    closed: Arc<Mutex<Vec<String>>>,
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        if let Ok(mut closed) = self.closed.lock() {
            closed.push(std::mem::take(&mut self.query));
        }
    }
}

/// Slow producer replaying per-query steps. Unscripted queries end at once.
#[derive(Default)]
pub struct ScriptedStream {
    scripts: Mutex<HashMap<String, Vec<StreamStep>>>,
    opens: Arc<Mutex<Vec<String>>>,
    closes: Arc<Mutex<Vec<String>>>,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, query: &str, steps: Vec<StreamStep>) -> Self {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.insert(normalize_query(query), steps);
        }
        self
    }

    /// Queries streamed so far, in order.
    pub fn opens(&self) -> Vec<String> {
        self.opens.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Queries whose stream has been dropped, in order.
    pub fn closes(&self) -> Vec<String> {
        self.closes.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl StreamSource for ScriptedStream {
    fn open_stream(&self, query: &str) -> CandidateStream {
        if let Ok(mut opens) = self.opens.lock() {
            opens.push(query.to_string());
        }
        let steps = self
            .scripts
            .lock()
            .ok()
            .and_then(|s| s.get(&normalize_query(query)).cloned())
            .unwrap_or_default();
        let guard = CloseGuard {
            query: query.to_string(),
            closed: self.closes.clone(),
        };

        async_stream::stream! {
            let _guard = guard;
            for step in steps {
                match step {
                    StreamStep::Record(candidate) => {
                        yield Ok(candidate);
                    }
                    StreamStep::Delay(delay) => tokio::time::sleep(delay).await,
                    StreamStep::Error(message) => {
                        yield Err(SyncError::upstream(message));
                        return;
                    }
                    StreamStep::Hang => std::future::pending::<()>().await,
                }
            }
        }
        .boxed()
    }
}
