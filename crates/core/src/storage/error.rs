use thiserror::Error;

/// Errors that can occur during backend operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
    #[error("Backend timed out after {0}ms")]
    Timeout(u64),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StorageError {
    /// True for errors that indicate the backend is unreachable rather than
    /// rejecting the request. These flip the service offline.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = StorageError::NotFound {
            entity: "ContentRecord",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "ContentRecord not found: abc-123");
    }

    #[test]
    fn test_unavailable_display() {
        let error = StorageError::Unavailable("connection refused".to_string());
        assert_eq!(error.to_string(), "Backend unavailable: connection refused");
    }

    #[test]
    fn test_timeout_display() {
        let error = StorageError::Timeout(5000);
        assert_eq!(error.to_string(), "Backend timed out after 5000ms");
    }

    #[test]
    fn test_is_unavailable() {
        assert!(StorageError::Unavailable("down".to_string()).is_unavailable());
        assert!(StorageError::Timeout(5000).is_unavailable());
        assert!(!StorageError::NotFound {
            entity: "ContentRecord",
            id: "x".to_string()
        }
        .is_unavailable());
        assert!(!StorageError::InvalidData("bad".to_string()).is_unavailable());
    }
}
