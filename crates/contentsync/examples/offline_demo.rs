//! Walks the service through an outage: reads and writes keep succeeding
//! while the backend is down, and the queued writes replay on reconnect.
//!
//! Run with `cargo run -p contentsync --example offline_demo`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use contentsync::cache::MemoryContentCache;
use contentsync::changelog::OfflineChangeLog;
use contentsync::persist::MemorySnapshotStore;
use contentsync::storage::MemoryBackend;
use contentsync::{ContentService, ServiceConfig};
use contentsync_core::content::{ContentFilters, ContentType, CreateContentRequest, EventKind};
use contentsync_core::storage::SnapshotStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let backend = Arc::new(MemoryBackend::new());
    let snapshots: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshotStore::new());
    let service = ContentService::new(
        ServiceConfig::from_env(),
        backend.clone(),
        Arc::new(MemoryContentCache::with_snapshots(1_000, snapshots.clone())),
        Arc::new(OfflineChangeLog::with_snapshots(snapshots)),
    );
    service.initialize().await;

    let subscription = service.subscribe(EventKind::ContentCreated, |event| {
        tracing::info!(kind = %event.kind(), "Received content event");
    });

    service
        .create_content(
            CreateContentRequest::new(ContentType::News, "Clubhouse reopens")
                .with_excerpt("The renovation is finished"),
        )
        .await?;
    tracing::info!(status = ?service.status().await, "Created while online");

    // Take the backend down; the next write is queued, the next read is
    // served from cache.
    backend.set_available(false);
    let queued = service
        .create_content(CreateContentRequest::new(ContentType::News, "Written offline"))
        .await?;
    tracing::info!(id = %queued.id, pending = queued.pending_sync, "Created while offline");

    let records = service
        .get_content(ContentType::News, &ContentFilters::new())
        .await;
    tracing::info!(count = records.len(), "Read while offline");
    tracing::info!(status = ?service.status().await, "Before replay");

    // Reconnect; the queued write replays in the background.
    backend.set_available(true);
    service.set_online(true);
    tokio::time::sleep(Duration::from_millis(100)).await;
    tracing::info!(status = ?service.status().await, "After replay");

    let synced = service.get_content_by_id(&queued.id).await?;
    tracing::info!(found = synced.is_some(), "Queued record visible after replay");

    subscription.unsubscribe();
    service.shutdown();
    Ok(())
}
