use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use contentsync_core::storage::{Result, SnapshotStore};

use super::io_error;

/// Snapshot store that keeps one JSON file per slot inside a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated snapshot behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.slot_path(slot)).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(err)),
        }
    }

    async fn save(&self, slot: &str, data: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(io_error)?;
        let path = self.slot_path(slot);
        let tmp = self.dir.join(format!("{slot}.json.tmp"));
        fs::write(&tmp, data).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)?;
        Ok(())
    }
}
