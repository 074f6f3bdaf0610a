//! In-memory request cache with LRU eviction.
//!
//! Entries are keyed by query fingerprint and expire lazily: a stale entry
//! stays in the store until a sweep or an invalidation removes it, so it can
//! still be served as a last-known-good value while offline.
//!
//! When constructed with a snapshot store the cache persists its full
//! contents after every mutation and can reload them on startup, which keeps
//! last-known-good data available across restarts.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use contentsync_core::cache::{fragment_matches, CacheEntry, CacheError, ContentCache, Result};
use contentsync_core::content::ContentRecord;
use contentsync_core::storage::SnapshotStore;

/// Snapshot slot under which the cache persists its contents.
const CACHE_SLOT: &str = "cache";

/// In-memory cache implementation with LRU eviction and optional snapshot
/// persistence.
#[derive(Clone)]
pub struct MemoryContentCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
}

impl MemoryContentCache {
    /// Creates a cache without persistence.
    ///
    /// # Panics
    ///
    /// Panics if `max_entries` is 0.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).expect("max_entries must be > 0");
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
            snapshots: None,
        }
    }

    /// Creates a cache that persists its contents to a snapshot store.
    pub fn with_snapshots(max_entries: usize, snapshots: Arc<dyn SnapshotStore>) -> Self {
        let mut cache = Self::new(max_entries);
        cache.snapshots = Some(snapshots);
        cache
    }

    /// Writes the full cache contents to the snapshot store, if configured.
    async fn persist(&self) -> Result<()> {
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let contents: Vec<(String, CacheEntry)> = {
            let store = self.store.read().await;
            store
                .iter()
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect()
        };
        let data = serde_json::to_vec(&contents)
            .map_err(|err| CacheError::Serialization(err.to_string()))?;
        snapshots
            .save(CACHE_SLOT, &data)
            .await
            .map_err(|err| CacheError::Persistence(err.to_string()))
    }
}

#[async_trait]
impl ContentCache for MemoryContentCache {
    async fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        let mut store = self.store.write().await;
        Ok(store.get(fingerprint).cloned())
    }

    async fn put(&self, fingerprint: &str, entry: CacheEntry) -> Result<()> {
        {
            let mut store = self.store.write().await;
            store.put(fingerprint.to_string(), entry);
        }
        self.persist().await
    }

    async fn invalidate(&self, fragments: &[&str]) -> Result<usize> {
        let dropped = {
            let mut store = self.store.write().await;
            let matching: Vec<String> = store
                .iter()
                .filter(|(key, _)| fragments.iter().any(|f| fragment_matches(key, f)))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &matching {
                store.pop(key);
            }
            matching.len()
        };
        if dropped > 0 {
            self.persist().await?;
        }
        Ok(dropped)
    }

    async fn sweep_expired(&self, ttl: Duration) -> Result<usize> {
        let dropped = {
            let mut store = self.store.write().await;
            // Offline entries are exempt: they are the last known good data.
            let expired: Vec<String> = store
                .iter()
                .filter(|(_, entry)| !entry.is_offline && !entry.is_fresh(ttl))
                .map(|(key, _)| key.clone())
                .collect();
            for key in &expired {
                store.pop(key);
            }
            expired.len()
        };
        if dropped > 0 {
            self.persist().await?;
        }
        Ok(dropped)
    }

    async fn size(&self) -> usize {
        self.store.read().await.len()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        let store = self.store.read().await;
        for (_, entry) in store.iter() {
            if let Some(record) = entry.records.iter().find(|r| r.id == id) {
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn rehydrate(&self) -> Result<()> {
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let data = snapshots
            .load(CACHE_SLOT)
            .await
            .map_err(|err| CacheError::Persistence(err.to_string()))?;
        let Some(data) = data else {
            return Ok(());
        };
        // A corrupt snapshot is discarded rather than failing startup.
        let contents: Vec<(String, CacheEntry)> = match serde_json::from_slice(&data) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::warn!(error = %err, "Discarding corrupt cache snapshot");
                return Ok(());
            }
        };
        let mut store = self.store.write().await;
        // Snapshots are saved most-recently-used first; insert in reverse so
        // the LRU order survives the round trip.
        for (key, entry) in contents.into_iter().rev() {
            store.put(key, entry);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemorySnapshotStore;
    use contentsync_core::cache::{content_fingerprint, content_fragment};
    use contentsync_core::content::{ContentFilters, ContentType};

    const TEST_MAX_ENTRIES: usize = 100;

    fn entry_with(title: &str) -> CacheEntry {
        CacheEntry::new(vec![ContentRecord::new(ContentType::News, title)])
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        cache.put("content:news", entry_with("A")).await.unwrap();

        let entry = cache.get("content:news").await.unwrap().unwrap();
        assert_eq!(entry.records[0].title, "A");
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        assert!(cache.get("content:news").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalidate_by_fragment() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        let filtered = content_fingerprint(
            ContentType::News,
            &ContentFilters::new().with_tag("youth"),
        );
        cache.put("content:news", entry_with("A")).await.unwrap();
        cache.put(&filtered, entry_with("B")).await.unwrap();
        cache.put("content:article", entry_with("C")).await.unwrap();

        let fragment = content_fragment(ContentType::News);
        let dropped = cache.invalidate(&[&fragment]).await.unwrap();

        assert_eq!(dropped, 2);
        assert!(cache.get("content:news").await.unwrap().is_none());
        assert!(cache.get(&filtered).await.unwrap().is_none());
        assert!(cache.get("content:article").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalidate_no_matches() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        cache.put("content:page", entry_with("A")).await.unwrap();

        let dropped = cache.invalidate(&["content:news"]).await.unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(cache.size().await, 1);
    }

    #[tokio::test]
    async fn test_sweep_drops_expired_keeps_fresh() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        let mut stale = entry_with("Stale");
        stale.cached_at = chrono::Utc::now() - chrono::Duration::seconds(600);
        cache.put("content:news", stale).await.unwrap();
        cache.put("content:article", entry_with("Fresh")).await.unwrap();

        let dropped = cache.sweep_expired(Duration::from_secs(300)).await.unwrap();

        assert_eq!(dropped, 1);
        assert!(cache.get("content:news").await.unwrap().is_none());
        assert!(cache.get("content:article").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sweep_spares_offline_entries() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        let mut stale = entry_with("Offline").offline();
        stale.cached_at = chrono::Utc::now() - chrono::Duration::seconds(600);
        cache.put("content:news", stale).await.unwrap();

        let dropped = cache.sweep_expired(Duration::from_secs(300)).await.unwrap();

        assert_eq!(dropped, 0);
        assert!(cache.get("content:news").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryContentCache::new(2);
        cache.put("content:news", entry_with("A")).await.unwrap();
        cache.put("content:article", entry_with("B")).await.unwrap();
        // Touch the first entry so the second becomes least recently used.
        cache.get("content:news").await.unwrap();
        cache.put("content:page", entry_with("C")).await.unwrap();

        assert!(cache.get("content:news").await.unwrap().is_some());
        assert!(cache.get("content:article").await.unwrap().is_none());
        assert!(cache.get("content:page").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let cache = MemoryContentCache::new(TEST_MAX_ENTRIES);
        let record = ContentRecord::new(ContentType::News, "Findable").with_id("abc-123");
        cache
            .put("content:news", CacheEntry::new(vec![record]))
            .await
            .unwrap();

        let found = cache.find_by_id("abc-123").await.unwrap().unwrap();
        assert_eq!(found.title, "Findable");
        assert!(cache.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let snapshots: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshotStore::new());
        let cache = MemoryContentCache::with_snapshots(TEST_MAX_ENTRIES, snapshots.clone());
        cache.put("content:news", entry_with("Persisted")).await.unwrap();

        let restored = MemoryContentCache::with_snapshots(TEST_MAX_ENTRIES, snapshots);
        restored.rehydrate().await.unwrap();

        let entry = restored.get("content:news").await.unwrap().unwrap();
        assert_eq!(entry.records[0].title, "Persisted");
    }

    #[tokio::test]
    async fn test_rehydrate_tolerates_corrupt_snapshot() {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        snapshots.save(CACHE_SLOT, b"not json").await.unwrap();

        let cache = MemoryContentCache::with_snapshots(TEST_MAX_ENTRIES, snapshots);
        cache.rehydrate().await.unwrap();
        assert_eq!(cache.size().await, 0);
    }

    #[tokio::test]
    #[should_panic(expected = "max_entries must be > 0")]
    async fn test_zero_max_entries_panics() {
        let _ = MemoryContentCache::new(0);
    }
}
