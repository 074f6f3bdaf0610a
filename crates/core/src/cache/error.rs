use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Cache failures are advisory: callers log them and fall through to the
/// backend or the fallback generator, they never abort a read.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache persistence failed: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_display() {
        let error = CacheError::Persistence("disk full".to_string());
        assert_eq!(error.to_string(), "Cache persistence failed: disk full");
    }

    #[test]
    fn test_serialization_display() {
        let error = CacheError::Serialization("invalid JSON".to_string());
        assert_eq!(error.to_string(), "Serialization error: invalid JSON");
    }
}
