//! Offline change log.
//!
//! Writes issued while the backend is unreachable are appended here in
//! arrival order and replayed FIFO once connectivity returns. Each change is
//! attempted once per replay; changes that fail their attempt are logged and
//! dropped rather than retried forever.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use contentsync_core::content::{ContentPatch, ContentRecord};
use contentsync_core::storage::{Result, SnapshotStore, StorageError};

/// Snapshot slot under which the log persists its contents.
const CHANGELOG_SLOT: &str = "changelog";

/// A write operation queued while offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PendingOperation {
    /// The full record synthesized at create time, so the client-side id
    /// survives the replay.
    Create(ContentRecord),
    Update { id: String, patch: ContentPatch },
    Delete { id: String },
}

impl PendingOperation {
    /// The id of the record the operation targets.
    pub fn target_id(&self) -> &str {
        match self {
            PendingOperation::Create(record) => &record.id,
            PendingOperation::Update { id, .. } | PendingOperation::Delete { id } => id,
        }
    }
}

/// One queued change with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    pub id: Uuid,
    pub operation: PendingOperation,
    pub queued_at: DateTime<Utc>,
}

impl PendingChange {
    fn new(operation: PendingOperation) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation,
            queued_at: Utc::now(),
        }
    }
}

/// FIFO log of writes awaiting replay, optionally persisted across restarts.
pub struct OfflineChangeLog {
    changes: Mutex<Vec<PendingChange>>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
}

impl OfflineChangeLog {
    /// Creates a log without persistence.
    pub fn new() -> Self {
        Self {
            changes: Mutex::new(Vec::new()),
            snapshots: None,
        }
    }

    /// Creates a log that persists its contents to a snapshot store.
    pub fn with_snapshots(snapshots: Arc<dyn SnapshotStore>) -> Self {
        Self {
            changes: Mutex::new(Vec::new()),
            snapshots: Some(snapshots),
        }
    }

    /// Appends an operation, returning the queued change.
    pub async fn append(&self, operation: PendingOperation) -> Result<PendingChange> {
        let change = PendingChange::new(operation);
        {
            let mut changes = self.changes.lock().await;
            changes.push(change.clone());
        }
        self.persist().await?;
        Ok(change)
    }

    /// Returns the queued changes in arrival order without removing them.
    ///
    /// Replay clears the log explicitly once every change has had its
    /// attempt, so a crash mid-replay leaves the queue intact.
    pub async fn pending(&self) -> Vec<PendingChange> {
        self.changes.lock().await.clone()
    }

    /// Empties the log.
    pub async fn clear(&self) -> Result<()> {
        {
            let mut changes = self.changes.lock().await;
            changes.clear();
        }
        self.persist().await
    }

    pub async fn len(&self) -> usize {
        self.changes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.changes.lock().await.is_empty()
    }

    /// Reloads queued changes from the snapshot store, if configured.
    ///
    /// A corrupt snapshot is discarded rather than failing startup.
    pub async fn rehydrate(&self) -> Result<()> {
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let Some(data) = snapshots.load(CHANGELOG_SLOT).await? else {
            return Ok(());
        };
        let restored: Vec<PendingChange> = match serde_json::from_slice(&data) {
            Ok(restored) => restored,
            Err(err) => {
                tracing::warn!(error = %err, "Discarding corrupt change log snapshot");
                return Ok(());
            }
        };
        let mut changes = self.changes.lock().await;
        *changes = restored;
        Ok(())
    }

    async fn persist(&self) -> Result<()> {
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let contents = self.changes.lock().await.clone();
        let data = serde_json::to_vec(&contents)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        snapshots.save(CHANGELOG_SLOT, &data).await
    }
}

impl Default for OfflineChangeLog {
    fn default() -> Self {
        Self::new()
    }
}
