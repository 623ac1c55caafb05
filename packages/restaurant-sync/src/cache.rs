//! TTL cache of reconciled restaurant lists, keyed by normalized query.
//!
//! Layout: key `restaurant_cache:<query>`, value
//! `{"restaurants": [...], "timestamp": <epoch-ms>}`. Entries older than the
//! expiry are treated as absent and purged when read; unreadable entries are
//! purged too.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::record::{normalize_query, RestaurantRecord};
use crate::store::KeyValueStore;

pub const CACHE_PREFIX: &str = "restaurant_cache:";
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(60 * 60);

/// Wall-clock source, in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub restaurants: Vec<RestaurantRecord>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Younger than the fresh window; no refetch needed
    Fresh(CacheEntry),
    /// Still valid but due for revalidation
    Stale(CacheEntry),
    Absent,
}

#[derive(Clone)]
pub struct RestaurantCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    expiry: Duration,
}

impl RestaurantCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            expiry: DEFAULT_EXPIRY,
        }
    }

    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn key_for(query: &str) -> String {
        format!("{}{}", CACHE_PREFIX, normalize_query(query))
    }

    fn age_ms(&self, entry: &CacheEntry) -> i64 {
        self.clock.now_ms() - entry.timestamp
    }

    fn is_valid(&self, entry: &CacheEntry) -> bool {
        self.age_ms(entry) < self.expiry.as_millis() as i64
    }

    /// Read an entry by raw key, purging it when expired or unreadable.
    fn read_key(&self, key: &str) -> Option<CacheEntry> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                return None;
            }
        };

        let entry = match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key, error = %e, "Removing unreadable cache entry");
                self.remove_key(key);
                return None;
            }
        };

        if !self.is_valid(&entry) {
            debug!(key, age_ms = self.age_ms(&entry), "Removing expired cache entry");
            self.remove_key(key);
            return None;
        }
        Some(entry)
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "Cache remove failed");
        }
    }

    fn cache_keys(&self) -> Vec<String> {
        match self.store.keys() {
            Ok(keys) => keys.into_iter().filter(|k| k.starts_with(CACHE_PREFIX)).collect(),
            Err(e) => {
                warn!(error = %e, "Cache key listing failed");
                Vec::new()
            }
        }
    }

    /// Valid entry for a query, if any.
    pub fn entry(&self, query: &str) -> Option<CacheEntry> {
        self.read_key(&Self::key_for(query))
    }

    pub fn restaurants(&self, query: &str) -> Option<Vec<RestaurantRecord>> {
        self.entry(query).map(|e| e.restaurants)
    }

    /// Classify the entry for `query` against a fresh window.
    pub fn lookup(&self, query: &str, fresh_window: Duration) -> CacheLookup {
        match self.entry(query) {
            Some(entry) if self.age_ms(&entry) < fresh_window.as_millis() as i64 => {
                CacheLookup::Fresh(entry)
            }
            Some(entry) => CacheLookup::Stale(entry),
            None => CacheLookup::Absent,
        }
    }

    /// Replace the entry for `query`, stamped now.
    pub fn put(&self, query: &str, restaurants: &[RestaurantRecord]) -> Result<()> {
        let entry = CacheEntry {
            restaurants: restaurants.to_vec(),
            timestamp: self.clock.now_ms(),
        };
        self.store
            .set(&Self::key_for(query), serde_json::to_string(&entry)?)
    }

    pub fn clear(&self, query: &str) {
        self.remove_key(&Self::key_for(query));
    }

    /// Every cached record across valid entries, first occurrence per id.
    pub fn all_restaurants(&self) -> Vec<RestaurantRecord> {
        let mut keys = self.cache_keys();
        keys.sort();

        let mut seen = HashSet::new();
        keys.iter()
            .filter_map(|k| self.read_key(k))
            .flat_map(|e| e.restaurants)
            .filter(|r| seen.insert(r.id.clone()))
            .collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<RestaurantRecord> {
        self.all_restaurants().into_iter().find(|r| r.id == id)
    }

    /// Cached records in `category`, followed by any samples not already present.
    pub fn by_category(
        &self,
        category: &str,
        samples: &[RestaurantRecord],
    ) -> Vec<RestaurantRecord> {
        let wanted = category.trim();
        let mut records: Vec<RestaurantRecord> = self
            .all_restaurants()
            .into_iter()
            .filter(|r| r.category.eq_ignore_ascii_case(wanted))
            .collect();

        for sample in samples.iter().filter(|s| s.category.eq_ignore_ascii_case(wanted)) {
            if !records.iter().any(|r| r.id == sample.id) {
                records.push(sample.clone());
            }
        }
        records
    }

    /// Drop expired and unreadable entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.cache_keys()
            .iter()
            .filter(|k| self.read_key(k).is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CandidateRecord;
    use crate::store::MemoryStore;
    use crate::testing::ManualClock;

    const MINUTE: i64 = 60_000;

    fn setup() -> (RestaurantCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(10_000_000));
        let cache = RestaurantCache::new(store.clone(), clock.clone());
        (cache, store, clock)
    }

    fn record(name: &str, category: &str) -> RestaurantRecord {
        CandidateRecord::new(name, "1 Main St")
            .with_category(category)
            .into_record()
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(RestaurantCache::key_for("  Sushi "), "restaurant_cache:sushi");
        assert_eq!(RestaurantCache::key_for("SUSHI"), RestaurantCache::key_for("sushi"));
    }

    #[test]
    fn test_put_then_lookup_by_age() {
        let (cache, _store, clock) = setup();
        cache.put("Sushi", &[record("A", "Sushi")]).unwrap();

        assert!(matches!(
            cache.lookup("sushi ", Duration::from_secs(300)),
            CacheLookup::Fresh(_)
        ));

        clock.advance_ms(10 * MINUTE);
        assert!(matches!(
            cache.lookup("sushi", Duration::from_secs(300)),
            CacheLookup::Stale(_)
        ));
        assert!(matches!(
            cache.lookup("sushi", Duration::from_secs(3600)),
            CacheLookup::Fresh(_)
        ));
    }

    #[test]
    fn test_expired_entry_is_purged_on_read() {
        let (cache, store, clock) = setup();
        cache.put("sushi", &[record("A", "Sushi")]).unwrap();

        clock.advance_ms(60 * MINUTE);

        assert_eq!(cache.lookup("sushi", Duration::from_secs(300)), CacheLookup::Absent);
        assert!(store.get("restaurant_cache:sushi").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let (cache, store, _clock) = setup();
        store.set("restaurant_cache:pizza", "{broken".into()).unwrap();

        assert!(cache.entry("pizza").is_none());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_all_restaurants_dedups_across_queries() {
        let (cache, store, _clock) = setup();
        cache.put("sushi", &[record("A", "Sushi"), record("B", "Sushi")]).unwrap();
        cache.put("japanese", &[record("A", "Sushi")]).unwrap();
        store.set("unrelated", "x".into()).unwrap();

        assert_eq!(cache.all_restaurants().len(), 2);
        let a = record("A", "Sushi");
        assert_eq!(cache.find_by_id(&a.id).map(|r| r.name), Some("A".into()));
        assert!(cache.find_by_id("missing").is_none());
    }

    #[test]
    fn test_by_category_appends_missing_samples() {
        let (cache, _store, _clock) = setup();
        cache.put("thai", &[record("Bangkok House", "Thai")]).unwrap();
        let samples = vec![record("Sample Thai", "Thai"), record("Sample Pizza", "Pizza")];

        let thai = cache.by_category("thai", &samples);
        let names: Vec<_> = thai.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bangkok House", "Sample Thai"]);
    }

    #[test]
    fn test_purge_and_clear() {
        let (cache, store, clock) = setup();
        cache.put("old", &[]).unwrap();
        clock.advance_ms(61 * MINUTE);
        cache.put("new", &[]).unwrap();
        store.set("restaurant_cache:bad", "nope".into()).unwrap();

        assert_eq!(cache.purge_expired(), 2);
        assert!(cache.entry("new").is_some());

        cache.clear("NEW");
        assert!(cache.entry("new").is_none());
    }
}
