use crate::view::{CoinStats, MarketPage};
use common::{
    models::{CategorySummary, CoinDetail, CoinSummary, Currency},
    CurrencyContext, Error, Result,
};
use connectors::MarketDataConnector;
use std::sync::{Arc, Mutex, PoisonError};
use store::{CacheConfig, QueryCache, QueryKey, QueryObserver, QueryState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Service for market data: threads the selected currency into every
/// currency-scoped fetch and caches responses per query key
pub struct MarketService {
    /// Upstream market-data connector
    connector: Arc<dyn MarketDataConnector>,
    /// Session-wide display currency
    currency: CurrencyContext,
    coins: QueryCache<Vec<CoinSummary>>,
    categories: QueryCache<Vec<CategorySummary>>,
    details: QueryCache<CoinDetail>,
    /// Observed market listing, re-run when the currency changes
    market: QueryObserver<Vec<CoinSummary>>,
    /// Page of the observed listing; 0 until something is observed.
    /// Held while a run begins so the page and its generation always match.
    observed_page: Mutex<u32>,
}

impl MarketService {
    pub fn new(
        connector: Arc<dyn MarketDataConnector>,
        currency: CurrencyContext,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            connector,
            currency,
            coins: QueryCache::new(cache_config),
            categories: QueryCache::new(cache_config),
            details: QueryCache::new(cache_config),
            market: QueryObserver::new(),
            observed_page: Mutex::new(0),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency.current()
    }

    /// Selects the display currency; returns whether it changed
    pub fn set_currency(&self, currency: Currency) -> bool {
        self.currency.set(currency)
    }

    /// List one page of coins. Uses the selected currency unless one is given.
    pub async fn list_coins(
        &self,
        page: u32,
        currency: Option<Currency>,
    ) -> Result<Vec<CoinSummary>> {
        let currency = currency.unwrap_or_else(|| self.currency.current());
        let key = QueryKey::coins(page, currency)?;

        debug!("Listing coins for {}", key);

        self.coins
            .fetch(&key, || self.connector.list_coins(page, currency))
            .await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        self.categories
            .fetch(&QueryKey::categories(), || self.connector.list_categories())
            .await
    }

    /// Get the full record for a coin. A missing or blank id resolves to
    /// not found without touching the upstream service.
    pub async fn coin_details(&self, id: Option<&str>) -> Result<CoinDetail> {
        let id = match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                debug!("Coin details requested without an id");
                return Err(Error::NotFound("Coin not found".to_string()));
            }
        };

        let key = QueryKey::coin_details(id)?;
        self.details
            .fetch(&key, || self.connector.coin_details(id))
            .await
    }

    /// Formatted market table for the selected currency
    pub async fn market_overview(&self, page: u32) -> Result<MarketPage> {
        let currency = self.currency.current();
        let coins = self.list_coins(page, Some(currency)).await?;
        Ok(MarketPage::new(page, currency, &coins))
    }

    /// Formatted detail panel. Figures are read by the currency selected
    /// when the record is rendered, not when it was fetched.
    pub async fn coin_stats(&self, id: Option<&str>) -> Result<CoinStats> {
        let coin = self.coin_details(id).await?;
        Ok(CoinStats::new(&coin, self.currency.current()))
    }

    /// Starts loading `page` of the listing in the selected currency and
    /// returns a subscription to its state
    pub fn observe_coins(
        self: &Arc<Self>,
        page: u32,
    ) -> watch::Receiver<QueryState<Vec<CoinSummary>>> {
        let rx = self.market.subscribe();

        if let Some((page, generation)) = self.begin_observed(Some(page)) {
            let service = self.clone();
            tokio::spawn(async move {
                let result = service.list_coins(page, None).await;
                service.market.complete(generation, result);
            });
        }

        rx
    }

    /// Optionally switches the observed page, then begins a run for it.
    /// Returns the page and the run's generation, or `None` if nothing is
    /// observed.
    fn begin_observed(&self, page: Option<u32>) -> Option<(u32, u64)> {
        let mut observed = self
            .observed_page
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(page) = page {
            *observed = page;
        }

        match *observed {
            0 => None,
            page => Some((page, self.market.begin())),
        }
    }

    /// Current state of the observed listing
    pub fn market_state(&self) -> QueryState<Vec<CoinSummary>> {
        self.market.state()
    }

    /// Re-runs the observed listing whenever the display currency changes
    pub fn follow_currency(self: Arc<Self>) -> JoinHandle<()> {
        let mut changes = self.currency.subscribe();

        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let currency = *changes.borrow_and_update();
                let Some((page, generation)) = self.begin_observed(None) else {
                    continue;
                };

                info!("Refreshing page {} in {}", page, currency.iso_code());
                let result = self.list_coins(page, Some(currency)).await;
                self.market.complete(generation, result);
            }
        })
    }
}
