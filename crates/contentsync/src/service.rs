//! The data access service.
//!
//! Single entry point for every content read and write. Composes the request
//! cache, the offline change log, the fallback generator and the event bus,
//! and owns the online/offline policy: reads never fail (they degrade to
//! cached and then placeholder data), writes either reach the backend or are
//! queued for replay.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;

use contentsync_core::cache::{content_fingerprint, content_fragment, CacheEntry, ContentCache};
use contentsync_core::content::{
    collect_tags, fallback_records, search_records, sort_by_recency, validate_create, validate_id,
    ContentEvent, ContentFilters, ContentPatch, ContentRecord, ContentType, CreateContentRequest,
    EventKind, ValidationError,
};
use contentsync_core::storage::{ContentBackend, RemoteChange, StorageError};

use crate::changelog::{OfflineChangeLog, PendingChange, PendingOperation};
use crate::config::ServiceConfig;
use crate::events::{EventBus, SubscriptionHandle};

/// Fragment matching every content fingerprint, used when the affected
/// content type is unknown.
const ALL_CONTENT_FRAGMENT: &str = "content:";

/// Errors surfaced to callers of the mutation operations.
///
/// Backend and network failures never appear here; those are recovered
/// internally by queueing or falling back.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Content not found: {0}")]
    NotFound(String),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Lifecycle state of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceState {
    Uninitialized,
    Initializing,
    /// Initialized with a reachable backend.
    Ready,
    /// Initialized without a reachable backend; serves cached and fallback
    /// data and queues writes.
    Degraded,
}

/// Introspection snapshot for operational visibility.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub state: ServiceState,
    pub online: bool,
    pub cache_size: usize,
    pub subscriber_count: usize,
    pub pending_offline_changes: usize,
}

/// The unified data-access service. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct ContentService {
    config: ServiceConfig,
    backend: Arc<dyn ContentBackend>,
    cache: Arc<dyn ContentCache>,
    changelog: Arc<OfflineChangeLog>,
    events: EventBus,
    state: Arc<RwLock<ServiceState>>,
    online: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ContentService {
    pub fn new(
        config: ServiceConfig,
        backend: Arc<dyn ContentBackend>,
        cache: Arc<dyn ContentCache>,
        changelog: Arc<OfflineChangeLog>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            backend,
            cache,
            changelog,
            events: EventBus::new(),
            state: Arc::new(RwLock::new(ServiceState::Uninitialized)),
            online: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
        }
    }

    /// Brings the service up: rehydrates persisted state, probes the
    /// backend, and starts the background tasks.
    ///
    /// Never fails. An unreachable backend leaves the service `Degraded`,
    /// still able to answer every query from cache and fallback data.
    pub async fn initialize(&self) {
        self.set_state(ServiceState::Initializing);

        if let Err(err) = self.cache.rehydrate().await {
            tracing::warn!(error = %err, "Cache rehydration failed; starting empty");
        }
        if let Err(err) = self.changelog.rehydrate().await {
            tracing::warn!(error = %err, "Change log rehydration failed; starting empty");
        }

        let probe = self
            .with_timeout(self.backend.fetch(ContentType::News, &ContentFilters::new()))
            .await;
        match probe {
            Ok(_) => {
                self.online.store(true, Ordering::SeqCst);
                self.set_state(ServiceState::Ready);
                tracing::info!("Service initialized with backend online");
            }
            Err(err) => {
                self.online.store(false, Ordering::SeqCst);
                self.set_state(ServiceState::Degraded);
                tracing::warn!(error = %err, "Backend unreachable; initialized in degraded mode");
            }
        }

        self.spawn_sweep_task();
        self.spawn_remote_listener().await;

        if self.is_online() && !self.changelog.is_empty().await {
            let service = self.clone();
            tokio::spawn(async move {
                service.replay_offline_changes().await;
            });
        }
    }

    /// Stops the background tasks. Foreground operations keep working.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Reads content for a type and filter set.
    ///
    /// Never fails: fresh cache, then backend, then any stale cache, then
    /// generated placeholders.
    pub async fn get_content(
        &self,
        content_type: ContentType,
        filters: &ContentFilters,
    ) -> Vec<ContentRecord> {
        let fingerprint = content_fingerprint(content_type, filters);
        let cached = match self.cache.get(&fingerprint).await {
            Ok(cached) => cached,
            Err(err) => {
                tracing::warn!(error = %err, fingerprint, "Cache read failed");
                None
            }
        };

        if let Some(entry) = &cached {
            if !entry.is_offline && entry.is_fresh(self.config.cache_ttl()) {
                return entry.records.clone();
            }
        }

        if self.is_online() {
            match self
                .with_timeout(self.backend.fetch(content_type, filters))
                .await
            {
                Ok(records) => {
                    self.cache_put(&fingerprint, CacheEntry::new(records.clone()))
                        .await;
                    return records;
                }
                Err(err) => {
                    tracing::warn!(%content_type, error = %err, "Backend fetch failed");
                    if err.is_unavailable() {
                        self.mark_offline();
                    }
                }
            }
        }

        // Offline, or the fetch just failed: any cached entry, even an
        // expired one, beats placeholder data.
        if let Some(entry) = cached {
            return entry.records;
        }

        let records = fallback_records(content_type);
        self.cache_put(&fingerprint, CacheEntry::new(records.clone()).offline())
            .await;
        records
    }

    /// Creates a content record.
    ///
    /// While offline (or when the backend rejects the write with an
    /// availability error) the record is queued for replay and returned
    /// optimistically, marked `pending_sync`.
    pub async fn create_content(&self, request: CreateContentRequest) -> Result<ContentRecord> {
        validate_create(&request)?;
        let content_type = request.content_type;
        let mut record = request.into_record();

        let mut queued = !self.is_online();
        if !queued {
            if let Err(err) = self.with_timeout(self.backend.insert(&record)).await {
                tracing::warn!(id = %record.id, error = %err, "Create failed against backend; queueing");
                if err.is_unavailable() {
                    self.mark_offline();
                }
                queued = true;
            }
        }
        if queued {
            record = record.pending();
            self.queue_change(PendingOperation::Create(record.clone()))
                .await;
        }

        self.invalidate_then_publish(
            &content_fragment(content_type),
            ContentEvent::created(record.clone()),
        )
        .await;
        Ok(record)
    }

    /// Applies a patch to an existing record.
    ///
    /// Offline updates patch the locally known copy of the record; updating
    /// an id with no local copy is reported as not found.
    pub async fn update_content(&self, id: &str, patch: ContentPatch) -> Result<ContentRecord> {
        validate_id(id)?;

        if self.is_online() {
            match self.with_timeout(self.backend.fetch_by_id(id)).await {
                Ok(Some(mut record)) => {
                    patch.apply_to(&mut record);
                    match self.with_timeout(self.backend.update(&record)).await {
                        Ok(()) => {
                            self.invalidate_then_publish(
                                &content_fragment(record.content_type),
                                ContentEvent::updated(record.clone()),
                            )
                            .await;
                            return Ok(record);
                        }
                        Err(err) => {
                            tracing::warn!(%id, error = %err, "Update failed against backend; queueing");
                            if err.is_unavailable() {
                                self.mark_offline();
                            }
                            return self.queue_update(id, patch, record).await;
                        }
                    }
                }
                Ok(None) => return Err(ServiceError::NotFound(id.to_string())),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "Backend lookup failed; updating offline");
                    if err.is_unavailable() {
                        self.mark_offline();
                    }
                }
            }
        }

        let Some(mut record) = self.find_local(id).await else {
            return Err(ServiceError::NotFound(id.to_string()));
        };
        patch.apply_to(&mut record);
        self.queue_update(id, patch, record).await
    }

    /// Deletes a record by id. Returns `false` when the backend reports the
    /// id as already gone; no event is published in that case.
    pub async fn delete_content(&self, id: &str) -> Result<bool> {
        validate_id(id)?;
        let content_type = self.find_local(id).await.map(|r| r.content_type);
        let fragment = content_type
            .map(content_fragment)
            .unwrap_or_else(|| ALL_CONTENT_FRAGMENT.to_string());

        if self.is_online() {
            match self.with_timeout(self.backend.remove(id)).await {
                Ok(()) => {
                    self.invalidate_then_publish(&fragment, ContentEvent::deleted(id, content_type))
                        .await;
                    return Ok(true);
                }
                Err(StorageError::NotFound { .. }) => return Ok(false),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "Delete failed against backend; queueing");
                    if err.is_unavailable() {
                        self.mark_offline();
                    }
                }
            }
        }

        self.queue_change(PendingOperation::Delete { id: id.to_string() })
            .await;
        self.invalidate_then_publish(&fragment, ContentEvent::deleted(id, content_type))
            .await;
        Ok(true)
    }

    /// Case-insensitive search across every content type, most recent first.
    /// Never fails; each per-type read degrades independently.
    pub async fn search_content(&self, query: &str, filters: &ContentFilters) -> Vec<ContentRecord> {
        let mut hits = search_records(&self.all_content(filters).await, query);
        sort_by_recency(&mut hits);
        hits
    }

    /// Looks a record up by id: local data first, then the backend.
    pub async fn get_content_by_id(&self, id: &str) -> Result<Option<ContentRecord>> {
        validate_id(id)?;
        if let Some(record) = self.find_local(id).await {
            return Ok(Some(record));
        }
        if self.is_online() {
            match self.with_timeout(self.backend.fetch_by_id(id)).await {
                Ok(found) => return Ok(found),
                Err(err) => {
                    tracing::warn!(%id, error = %err, "Backend lookup failed");
                    if err.is_unavailable() {
                        self.mark_offline();
                    }
                }
            }
        }
        Ok(None)
    }

    /// Distinct category labels across all content, sorted.
    pub async fn get_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .all_content(&ContentFilters::new())
            .await
            .into_iter()
            .filter_map(|record| record.category)
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Distinct tags across all content, sorted.
    pub async fn get_tags(&self) -> Vec<String> {
        collect_tags(&self.all_content(&ContentFilters::new()).await)
    }

    /// Registers a callback for a content event kind.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> SubscriptionHandle
    where
        F: Fn(&ContentEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(kind, callback)
    }

    /// Introspection snapshot; not used on the request path.
    pub async fn status(&self) -> ServiceStatus {
        ServiceStatus {
            state: self.state(),
            online: self.is_online(),
            cache_size: self.cache.size().await,
            subscriber_count: self.events.subscriber_count(),
            pending_offline_changes: self.changelog.len().await,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Records a connectivity transition. Going online kicks off change log
    /// replay in the background; the caller is not blocked on it.
    pub fn set_online(&self, online: bool) {
        let was_online = self.online.swap(online, Ordering::SeqCst);
        if online && !was_online {
            tracing::info!("Connectivity restored; replaying queued changes");
            let service = self.clone();
            tokio::spawn(async move {
                service.replay_offline_changes().await;
            });
        } else if !online && was_online {
            tracing::info!("Going offline; writes will be queued");
        }
    }

    /// Replays the offline change log against the backend in enqueue order.
    ///
    /// Each change gets exactly one attempt; a failing change is logged and
    /// dropped without affecting the rest. The log is cleared once every
    /// change has been attempted.
    pub async fn replay_offline_changes(&self) {
        let pending = self.changelog.pending().await;
        if pending.is_empty() {
            return;
        }
        tracing::info!(count = pending.len(), "Replaying offline changes");

        for change in &pending {
            if let Err(err) = self.replay_change(change).await {
                tracing::warn!(
                    change_id = %change.id,
                    target = change.operation.target_id(),
                    error = %err,
                    "Dropping offline change after failed replay"
                );
            }
        }

        if let Err(err) = self.changelog.clear().await {
            tracing::warn!(error = %err, "Failed to persist cleared change log");
        }
        // Replayed writes changed backend state; drop every content cache
        // entry so the next reads see the canonical records.
        if let Err(err) = self.cache.invalidate(&[ALL_CONTENT_FRAGMENT]).await {
            tracing::warn!(error = %err, "Post-replay cache invalidation failed");
        }
    }

    async fn replay_change(&self, change: &PendingChange) -> std::result::Result<(), StorageError> {
        match &change.operation {
            PendingOperation::Create(record) => {
                let mut record = record.clone();
                record.pending_sync = false;
                self.with_timeout(self.backend.insert(&record)).await
            }
            PendingOperation::Update { id, patch } => {
                match self.with_timeout(self.backend.fetch_by_id(id)).await? {
                    Some(mut record) => {
                        patch.apply_to(&mut record);
                        self.with_timeout(self.backend.update(&record)).await
                    }
                    None => Err(StorageError::NotFound {
                        entity: "ContentRecord",
                        id: id.clone(),
                    }),
                }
            }
            PendingOperation::Delete { id } => self.with_timeout(self.backend.remove(id)).await,
        }
    }

    async fn queue_update(
        &self,
        id: &str,
        patch: ContentPatch,
        record: ContentRecord,
    ) -> Result<ContentRecord> {
        let record = record.pending();
        self.queue_change(PendingOperation::Update {
            id: id.to_string(),
            patch,
        })
        .await;
        self.invalidate_then_publish(
            &content_fragment(record.content_type),
            ContentEvent::updated(record.clone()),
        )
        .await;
        Ok(record)
    }

    async fn queue_change(&self, operation: PendingOperation) {
        match self.changelog.append(operation).await {
            Ok(change) => {
                tracing::debug!(change_id = %change.id, target = change.operation.target_id(), "Queued offline change")
            }
            // The change is queued in memory even when persisting it failed.
            Err(err) => tracing::warn!(error = %err, "Failed to persist offline change"),
        }
    }

    /// Looks a record up in local state: the cache, then pending offline
    /// creates.
    async fn find_local(&self, id: &str) -> Option<ContentRecord> {
        match self.cache.find_by_id(id).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(err) => tracing::warn!(%id, error = %err, "Cache lookup failed"),
        }
        self.changelog
            .pending()
            .await
            .into_iter()
            .find_map(|change| match change.operation {
                PendingOperation::Create(record) if record.id == id => Some(record),
                _ => None,
            })
    }

    async fn all_content(&self, filters: &ContentFilters) -> Vec<ContentRecord> {
        let mut all = Vec::new();
        for content_type in ContentType::ALL {
            all.extend(self.get_content(content_type, filters).await);
        }
        all
    }

    /// Invalidation always happens-before the publish, so a subscriber that
    /// re-reads on notification never sees the pre-mutation cached value.
    async fn invalidate_then_publish(&self, fragment: &str, event: ContentEvent) {
        match self.cache.invalidate(&[fragment]).await {
            Ok(dropped) => tracing::debug!(fragment, dropped, "Invalidated cache entries"),
            Err(err) => tracing::warn!(fragment, error = %err, "Cache invalidation failed"),
        }
        self.events.publish(&event);
    }

    async fn cache_put(&self, fingerprint: &str, entry: CacheEntry) {
        if let Err(err) = self.cache.put(fingerprint, entry).await {
            tracing::warn!(fingerprint, error = %err, "Failed to cache result");
        }
    }

    fn mark_offline(&self) {
        if self.online.swap(false, Ordering::SeqCst) {
            tracing::info!("Backend unreachable; switching to offline mode");
        }
    }

    fn state(&self) -> ServiceState {
        *self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: ServiceState) {
        *self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = state;
    }

    async fn with_timeout<T, F>(&self, operation: F) -> std::result::Result<T, StorageError>
    where
        F: Future<Output = std::result::Result<T, StorageError>>,
    {
        let timeout = self.config.backend_timeout();
        match tokio::time::timeout(timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Timeout(timeout.as_millis() as u64)),
        }
    }

    fn spawn_sweep_task(&self) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.config.cache_ttl();
        let interval = self.config.sweep_interval();
        let mut shutdown = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick fires immediately; skip it.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => match cache.sweep_expired(ttl).await {
                        Ok(0) => {}
                        Ok(dropped) => tracing::debug!(dropped, "Swept expired cache entries"),
                        Err(err) => tracing::warn!(error = %err, "Cache sweep failed"),
                    },
                    _ = shutdown.recv() => break,
                }
            }
        });
    }

    /// Starts the listener for backend-pushed changes. Backends without push
    /// support simply skip this.
    async fn spawn_remote_listener(&self) {
        let mut receiver = match self.backend.subscribe_changes().await {
            Ok(Some(receiver)) => receiver,
            Ok(None) => {
                tracing::debug!("Backend has no change push support");
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to subscribe to remote changes");
                return;
            }
        };
        let service = self.clone();
        let mut shutdown = self.shutdown_tx.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    change = receiver.recv() => match change {
                        Ok(change) => service.apply_remote_change(change).await,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Remote change stream lagged; flushing content cache");
                            if let Err(err) = service.cache.invalidate(&[ALL_CONTENT_FRAGMENT]).await {
                                tracing::warn!(error = %err, "Cache flush failed");
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = shutdown.recv() => break,
                }
            }
        });
    }

    async fn apply_remote_change(&self, change: RemoteChange) {
        let (fragment, event) = match change {
            RemoteChange::Inserted(record) => (
                content_fragment(record.content_type),
                ContentEvent::created(record),
            ),
            RemoteChange::Updated(record) => (
                content_fragment(record.content_type),
                ContentEvent::updated(record),
            ),
            RemoteChange::Deleted(id) => (
                ALL_CONTENT_FRAGMENT.to_string(),
                ContentEvent::deleted(id, None),
            ),
        };
        self.invalidate_then_publish(&fragment, event).await;
    }
}
