use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::content::{ContentFilters, ContentRecord, ContentType};

use super::{RemoteChange, Result};

/// The remote content store.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    /// Fetches all records of a type matching the filters.
    async fn fetch(
        &self,
        content_type: ContentType,
        filters: &ContentFilters,
    ) -> Result<Vec<ContentRecord>>;

    /// Fetches a single record by id.
    async fn fetch_by_id(&self, id: &str) -> Result<Option<ContentRecord>>;

    /// Inserts a new record. The record keeps its client-side id.
    async fn insert(&self, record: &ContentRecord) -> Result<()>;

    /// Replaces an existing record.
    async fn update(&self, record: &ContentRecord) -> Result<()>;

    /// Removes a record by id.
    async fn remove(&self, id: &str) -> Result<()>;

    /// Subscribes to changes pushed by the backend. Backends without push
    /// support return `None`.
    async fn subscribe_changes(&self) -> Result<Option<broadcast::Receiver<RemoteChange>>> {
        Ok(None)
    }
}

/// Persistence for snapshots of client-side state (cache contents, the
/// offline change log) across restarts.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the snapshot stored under a slot, or `None` if absent.
    async fn load(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a snapshot under a slot, replacing any existing one.
    async fn save(&self, slot: &str, data: &[u8]) -> Result<()>;
}
