use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentRecord;

use super::Result;

/// A cached query result: the records plus the metadata needed for
/// freshness checks and offline bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub records: Vec<ContentRecord>,
    pub cached_at: DateTime<Utc>,
    /// Set when the entry was stored while the service was offline; offline
    /// entries are exempt from freshness expiry until connectivity returns.
    #[serde(default)]
    pub is_offline: bool,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self {
            records,
            cached_at: Utc::now(),
            is_offline: false,
        }
    }

    /// Marks the entry as stored while offline.
    pub fn offline(mut self) -> Self {
        self.is_offline = true;
        self
    }

    /// Returns true while the entry is within its TTL.
    ///
    /// Clock skew that puts `cached_at` in the future counts as fresh.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .map(|elapsed| elapsed <= ttl)
            .unwrap_or(true)
    }
}

/// Trait for the request cache keyed by query fingerprint.
#[async_trait]
pub trait ContentCache: Send + Sync {
    /// Gets the entry stored under a fingerprint, fresh or not.
    async fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>>;

    /// Stores an entry under a fingerprint, replacing any existing one.
    async fn put(&self, fingerprint: &str, entry: CacheEntry) -> Result<()>;

    /// Drops every entry whose fingerprint contains any of the fragments.
    /// Returns the number of entries dropped.
    async fn invalidate(&self, fragments: &[&str]) -> Result<usize>;

    /// Drops every entry older than the TTL, except offline entries.
    /// Returns the number of entries dropped.
    async fn sweep_expired(&self, ttl: Duration) -> Result<usize>;

    /// Number of entries currently stored.
    async fn size(&self) -> usize;

    /// Scans cached entries for a record with the given id.
    async fn find_by_id(&self, id: &str) -> Result<Option<ContentRecord>>;

    /// Reloads previously persisted entries, if the cache persists at all.
    async fn rehydrate(&self) -> Result<()> {
        Ok(())
    }
}
