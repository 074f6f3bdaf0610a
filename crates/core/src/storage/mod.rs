mod error;
mod traits;
mod types;

pub use error::{Result, StorageError};
pub use traits::{ContentBackend, SnapshotStore};
pub use types::RemoteChange;
