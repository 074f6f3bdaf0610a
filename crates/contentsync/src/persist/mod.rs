//! Snapshot stores for persisting client-side state across restarts.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemorySnapshotStore;

use contentsync_core::storage::StorageError;

fn io_error(err: std::io::Error) -> StorageError {
    StorageError::Unavailable(err.to_string())
}
