use common::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the CoinGecko connector
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoinGeckoConfig {
    /// Base URL all endpoint paths are appended to
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CoinGeckoConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Reads `COINGECKO_API_URL` and `REQUEST_TIMEOUT_SECS`, falling back to
    /// defaults when unset
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("COINGECKO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::ConfigError(format!("Invalid REQUEST_TIMEOUT_SECS: {}", raw))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }
}
