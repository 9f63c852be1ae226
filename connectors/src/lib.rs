pub mod coingecko;
mod config;

use async_trait::async_trait;
use common::{
    models::{CategorySummary, CoinDetail, CoinSummary, Currency},
    Result,
};

pub use config::CoinGeckoConfig;

/// Number of coins per market listing page
pub const PAGE_SIZE: u32 = 10;

/// Read-only operations against the upstream market-data service
#[async_trait]
pub trait MarketDataConnector: Send + Sync {
    /// One page of coins ordered by descending market cap, priced in `currency`.
    /// Pages start at 1.
    async fn list_coins(&self, page: u32, currency: Currency) -> Result<Vec<CoinSummary>>;

    /// All categories tracked upstream
    async fn list_categories(&self) -> Result<Vec<CategorySummary>>;

    /// Full record for one coin; `id` must be non-empty
    async fn coin_details(&self, id: &str) -> Result<CoinDetail>;
}
