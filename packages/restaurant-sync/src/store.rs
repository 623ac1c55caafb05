//! Flat key-value storage behind the restaurant cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use tracing::warn;

use crate::error::{Result, SyncError};

/// Minimal string store. Implementations must be safe to share across tasks.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: String) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

fn poisoned() -> SyncError {
    SyncError::Storage("store lock poisoned".into())
}

/// In-process store. Counts writes so callers can observe coalescing.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().map_err(|_| poisoned())?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().map_err(|_| poisoned())?.keys().cloned().collect())
    }
}

/// Single JSON file holding the whole map, rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open or create the store at `path`.
    ///
    /// An unreadable or corrupt file starts an empty map; it is overwritten
    /// on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding corrupt cache file");
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(SyncError::Storage(format!("{}: {}", path.display(), e))),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::Storage(format!("{}: {}", parent.display(), e)))?;
        }
        let tmp = self.path.with_extension("tmp");
        let text = serde_json::to_string(entries)?;
        std::fs::write(&tmp, text)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|e| SyncError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().map_err(|_| poisoned())?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().map_err(|_| poisoned())?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "restaurant-sync-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        store.set("a", "1".into()).unwrap();
        store.set("a", "2".into()).unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);

        store.remove("a").unwrap();
        assert!(store.get("a").unwrap().is_none());
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        {
            let store = FileStore::open(&path).unwrap();
            store.set("restaurant_cache:sushi", "{}".into()).unwrap();
        }
        let reopened = FileStore::open(&path).unwrap();

        assert_eq!(
            reopened.get("restaurant_cache:sushi").unwrap().as_deref(),
            Some("{}")
        );
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_recovers_from_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert!(store.keys().unwrap().is_empty());

        store.set("k", "v".into()).unwrap();
        assert_eq!(FileStore::open(&path).unwrap().get("k").unwrap().as_deref(), Some("v"));
        let _ = std::fs::remove_file(&path);
    }
}
