mod error;
mod keys;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{content_fingerprint, content_fragment, fragment_matches};
pub use traits::{CacheEntry, ContentCache};
