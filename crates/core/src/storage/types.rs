use serde::{Deserialize, Serialize};

use crate::content::ContentRecord;

/// A change that originated outside this client, pushed by the backend.
///
/// Remote changes drive cache invalidation so that a record modified from
/// another device does not keep being served from a stale cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum RemoteChange {
    Inserted(ContentRecord),
    Updated(ContentRecord),
    Deleted(String),
}

impl RemoteChange {
    /// The id of the affected record.
    pub fn id(&self) -> &str {
        match self {
            RemoteChange::Inserted(record) | RemoteChange::Updated(record) => &record.id,
            RemoteChange::Deleted(id) => id,
        }
    }
}
