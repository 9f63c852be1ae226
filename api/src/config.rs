use common::models::Currency;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Display currency selected when the service starts
    pub default_currency: Currency,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            default_currency: Currency::default(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let default_currency = match std::env::var("DEFAULT_CURRENCY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring DEFAULT_CURRENCY: {}", e);
                Currency::default()
            }),
            Err(_) => Currency::default(),
        };

        Self {
            host,
            port,
            default_currency,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
