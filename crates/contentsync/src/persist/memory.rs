use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use contentsync_core::storage::{Result, SnapshotStore};

/// Snapshot store backed by a process-local map. Nothing survives a restart;
/// useful for tests and for running without persistence.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let slots = self.slots.read().await;
        Ok(slots.get(slot).cloned())
    }

    async fn save(&self, slot: &str, data: &[u8]) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots.insert(slot.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = MemorySnapshotStore::new();
        store.save("cache", b"payload").await.unwrap();

        assert_eq!(store.load("cache").await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.load("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces() {
        let store = MemorySnapshotStore::new();
        store.save("cache", b"first").await.unwrap();
        store.save("cache", b"second").await.unwrap();

        assert_eq!(store.load("cache").await.unwrap(), Some(b"second".to_vec()));
    }
}
