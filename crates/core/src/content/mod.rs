mod error;
mod events;
mod fallback;
mod filters;
mod operations;
mod requests;
mod types;

pub use error::ValidationError;
pub use events::{ContentEvent, EventKind};
pub use fallback::fallback_records;
pub use filters::ContentFilters;
pub use operations::{
    collect_tags, matches_filters, search_records, sort_by_recency, validate_create, validate_id,
};
pub use requests::{ContentPatch, CreateContentRequest};
pub use types::{ContentRecord, ContentStatus, ContentType, EngagementCounts, EventDetails};
