use thiserror::Error;

/// Errors raised when a caller supplies malformed input to a mutation.
///
/// These are always surfaced synchronously and never retried or queued.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Content title cannot be empty")]
    EmptyTitle,
    #[error("Content title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Content id is required")]
    MissingId,
    #[error("Unknown content type: {0}")]
    UnknownContentType(String),
}
