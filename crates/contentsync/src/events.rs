//! Event bus for content change notifications.
//!
//! Subscribers register a callback per event kind. Publishing runs every
//! callback for the event's kind; a panicking subscriber is isolated and
//! logged so it can never take down the publisher or starve its peers.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use contentsync_core::content::{ContentEvent, EventKind};

type Subscriber = Arc<dyn Fn(&ContentEvent) + Send + Sync>;

#[derive(Default)]
struct EventBusInner {
    registry: RwLock<HashMap<EventKind, HashMap<u64, Subscriber>>>,
    next_id: AtomicU64,
}

/// Synchronous pub/sub bus keyed by event kind.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for an event kind.
    ///
    /// The returned handle cancels the subscription; dropping the handle
    /// without calling [`SubscriptionHandle::unsubscribe`] leaves the
    /// subscription active.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F) -> SubscriptionHandle
    where
        F: Fn(&ContentEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let mut registry = self
            .inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registry
            .entry(kind)
            .or_default()
            .insert(id, Arc::new(callback));
        SubscriptionHandle {
            bus: Arc::clone(&self.inner),
            kind,
            id,
            active: AtomicBool::new(true),
        }
    }

    /// Delivers an event to every subscriber of its kind.
    ///
    /// Callbacks run outside the registry lock, so a subscriber may
    /// subscribe or unsubscribe from within its callback.
    pub fn publish(&self, event: &ContentEvent) {
        let subscribers: Vec<Subscriber> = {
            let registry = self
                .inner
                .registry
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            registry
                .get(&event.kind())
                .map(|subs| subs.values().cloned().collect())
                .unwrap_or_default()
        };
        for subscriber in subscribers {
            if catch_unwind(AssertUnwindSafe(|| subscriber(event))).is_err() {
                tracing::warn!(kind = %event.kind(), "Subscriber panicked while handling event");
            }
        }
    }

    /// Total number of active subscriptions across all kinds.
    pub fn subscriber_count(&self) -> usize {
        let registry = self
            .inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        registry.values().map(HashMap::len).sum()
    }
}

/// Cancels one subscription. Unsubscribing twice is a no-op.
pub struct SubscriptionHandle {
    bus: Arc<EventBusInner>,
    kind: EventKind,
    id: u64,
    active: AtomicBool,
}

impl SubscriptionHandle {
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }
        let mut registry = self
            .bus
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(subs) = registry.get_mut(&self.kind) {
            subs.remove(&self.id);
            if subs.is_empty() {
                registry.remove(&self.kind);
            }
        }
    }
}
