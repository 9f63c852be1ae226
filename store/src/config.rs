use crate::StoreError;
use std::time::Duration;

pub const DEFAULT_TTL_SECS: u64 = 300;

/// Configuration for the in-memory query cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a successful response is served without refetching
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}

impl CacheConfig {
    /// Create a cache configuration from `CACHE_TTL_SECONDS`, defaulting to
    /// five minutes when unset
    pub fn from_env() -> Result<Self, StoreError> {
        let ttl_secs = match std::env::var("CACHE_TTL_SECONDS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                StoreError::ConfigError(format!("Invalid CACHE_TTL_SECONDS: {}", raw))
            })?,
            Err(_) => DEFAULT_TTL_SECS,
        };

        Ok(Self {
            ttl: Duration::from_secs(ttl_secs),
        })
    }
}
