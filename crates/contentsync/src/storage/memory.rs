//! In-memory content backend.
//!
//! Stands in for the hosted store during development and tests. Availability
//! can be toggled to simulate outages, and remote changes from other clients
//! can be injected through [`MemoryBackend::emit_remote`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use contentsync_core::content::{
    matches_filters, sort_by_recency, ContentFilters, ContentRecord, ContentType,
};
use contentsync_core::storage::{ContentBackend, RemoteChange, Result, StorageError};

const REMOTE_CHANGE_CAPACITY: usize = 64;

/// In-memory backend with toggleable availability.
pub struct MemoryBackend {
    records: RwLock<HashMap<String, ContentRecord>>,
    available: AtomicBool,
    changes: broadcast::Sender<RemoteChange>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(REMOTE_CHANGE_CAPACITY);
        Self {
            records: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
            changes,
        }
    }

    /// Pre-populates the store.
    pub async fn seed(&self, records: Vec<ContentRecord>) {
        let mut store = self.records.write().await;
        for record in records {
            store.insert(record.id.clone(), record);
        }
    }

    /// Simulates the backend going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Injects a change as if another client had made it.
    pub fn emit_remote(&self, change: RemoteChange) {
        // Delivery fails only when nobody subscribed, which is fine.
        let _ = self.changes.send(change);
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("backend is offline".to_string()))
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentBackend for MemoryBackend {
    async fn fetch(
        &self,
        content_type: ContentType,
        filters: &ContentFilters,
    ) -> Result<Vec<ContentRecord>> {
        self.check_available()?;
        let store = self.records.read().await;
        let mut matching: Vec<ContentRecord> = store
            .values()
            .filter(|record| record.content_type == content_type)
            .filter(|record| matches_filters(record, filters))
            .cloned()
            .collect();
        sort_by_recency(&mut matching);
        Ok(matching)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        self.check_available()?;
        let store = self.records.read().await;
        Ok(store.get(id).cloned())
    }

    async fn insert(&self, record: &ContentRecord) -> Result<()> {
        self.check_available()?;
        let mut store = self.records.write().await;
        store.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &ContentRecord) -> Result<()> {
        self.check_available()?;
        let mut store = self.records.write().await;
        if !store.contains_key(&record.id) {
            return Err(StorageError::NotFound {
                entity: "ContentRecord",
                id: record.id.clone(),
            });
        }
        store.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.check_available()?;
        let mut store = self.records.write().await;
        if store.remove(id).is_none() {
            return Err(StorageError::NotFound {
                entity: "ContentRecord",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn subscribe_changes(&self) -> Result<Option<broadcast::Receiver<RemoteChange>>> {
        Ok(Some(self.changes.subscribe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_filters_by_type_and_filters() {
        let backend = MemoryBackend::new();
        backend
            .seed(vec![
                ContentRecord::new(ContentType::News, "A").with_tag("youth"),
                ContentRecord::new(ContentType::News, "B"),
                ContentRecord::new(ContentType::Article, "C").with_tag("youth"),
            ])
            .await;

        let all_news = backend
            .fetch(ContentType::News, &ContentFilters::new())
            .await
            .unwrap();
        assert_eq!(all_news.len(), 2);

        let tagged = backend
            .fetch(ContentType::News, &ContentFilters::new().with_tag("youth"))
            .await
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "A");
    }

    #[tokio::test]
    async fn test_unavailable_backend_rejects_everything() {
        let backend = MemoryBackend::new();
        backend.set_available(false);

        let err = backend
            .fetch(ContentType::News, &ContentFilters::new())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());

        let record = ContentRecord::new(ContentType::News, "X");
        assert!(backend.insert(&record).await.unwrap_err().is_unavailable());
        assert!(backend.remove("abc").await.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let backend = MemoryBackend::new();
        let record = ContentRecord::new(ContentType::Page, "Ghost");

        let err = backend.update(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove() {
        let backend = MemoryBackend::new();
        let record = ContentRecord::new(ContentType::Page, "Doomed").with_id("doomed");
        backend.seed(vec![record]).await;

        backend.remove("doomed").await.unwrap();
        assert!(backend.fetch_by_id("doomed").await.unwrap().is_none());
        assert!(matches!(
            backend.remove("doomed").await.unwrap_err(),
            StorageError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_remote_change_subscription() {
        let backend = MemoryBackend::new();
        let mut receiver = backend.subscribe_changes().await.unwrap().unwrap();

        backend.emit_remote(RemoteChange::Deleted("abc".to_string()));

        let change = receiver.recv().await.unwrap();
        assert_eq!(change.id(), "abc");
    }
}
