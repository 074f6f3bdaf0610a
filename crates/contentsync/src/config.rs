use std::{env, time::Duration};

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Interval between expired-entry sweeps in seconds (default: 60)
    pub sweep_interval_seconds: u64,
    /// Upper bound on any single backend call in milliseconds (default: 5,000)
    pub backend_timeout_ms: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SWEEP_INTERVAL_SECONDS` - Expired-entry sweep interval (default: 60)
    /// - `BACKEND_TIMEOUT_MS` - Backend call timeout in ms (default: 5,000)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            sweep_interval_seconds: env::var("SWEEP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            backend_timeout_ms: env::var("BACKEND_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Get the backend timeout as a Duration.
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversions() {
        let config = ServiceConfig {
            cache_ttl_seconds: 600,
            cache_max_entries: 10_000,
            sweep_interval_seconds: 30,
            backend_timeout_ms: 2_500,
        };

        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.sweep_interval(), Duration::from_secs(30));
        assert_eq!(config.backend_timeout(), Duration::from_millis(2_500));
    }

    #[test]
    fn test_default_values() {
        // Clear environment variables to test defaults
        env::remove_var("CACHE_TTL_SECONDS");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("SWEEP_INTERVAL_SECONDS");
        env::remove_var("BACKEND_TIMEOUT_MS");

        let config = ServiceConfig::from_env();

        assert_eq!(config.cache_ttl_seconds, 300);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.sweep_interval_seconds, 60);
        assert_eq!(config.backend_timeout_ms, 5_000);
    }
}
