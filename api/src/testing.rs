//! In-memory connector used by the service and handler tests.

use async_trait::async_trait;
use common::{
    models::{CategorySummary, CoinDetail, CoinSummary, Currency, Sparkline},
    Error, Resource, Result,
};
use connectors::{MarketDataConnector, PAGE_SIZE};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct MockConnector {
    calls: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Upstream requests seen so far, in query key form
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Price of the coin at `rank`
    pub fn price(rank: u32, currency: Currency) -> f64 {
        match currency {
            Currency::Inr => 5_600_000.0 / rank as f64,
            Currency::Cad => 91_000.0 / rank as f64,
        }
    }

    fn record(&self, call: String, resource: Resource) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Fetch(resource))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketDataConnector for MockConnector {
    async fn list_coins(&self, page: u32, currency: Currency) -> Result<Vec<CoinSummary>> {
        self.record(format!("coins/{}/{}", page, currency), Resource::Coins)?;

        let first_rank = (page - 1) * PAGE_SIZE + 1;
        let coins = (first_rank..first_rank + PAGE_SIZE)
            .map(|rank| {
                let price = Self::price(rank, currency);
                CoinSummary {
                    id: format!("coin-{}", rank),
                    symbol: format!("c{}", rank),
                    name: format!("Coin {}", rank),
                    image: Some(format!("https://img/{}.png", rank)),
                    market_cap_rank: Some(rank),
                    current_price: Some(price),
                    price_change_percentage_24h: Some(rank as f64 - 2.0),
                    market_cap: Some(price * 1_000_000.0),
                    total_volume: None,
                    high_24h: None,
                    low_24h: None,
                    sparkline_in_7d: Some(Sparkline {
                        price: vec![price * 0.9, price],
                    }),
                }
            })
            .collect();

        Ok(coins)
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        self.record("categories".to_string(), Resource::Categories)?;

        Ok(vec![CategorySummary {
            id: "layer-1".to_string(),
            name: "Layer 1 (L1)".to_string(),
            market_cap: Some(2.1e12),
            market_cap_change_24h: Some(-0.5),
            content: Some("Base layer blockchains".to_string()),
            top_3_coins: vec!["https://img/1.png".to_string()],
            volume_24h: None,
            updated_at: None,
        }])
    }

    async fn coin_details(&self, id: &str) -> Result<CoinDetail> {
        self.record(format!("coin/{}", id), Resource::CoinDetails)?;

        if id != "bitcoin" {
            return Err(Error::Fetch(Resource::CoinDetails));
        }

        let detail = serde_json::from_value(serde_json::json!({
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "market_cap_rank": 1,
            "image": {"large": "https://img/btc-large.png"},
            "categories": ["Cryptocurrency", "Layer 1 (L1)"],
            "description": {"en": "Peer-to-peer electronic cash."},
            "links": {
                "homepage": ["http://www.bitcoin.org"],
                "twitter_screen_name": "bitcoin",
                "repos_url": {"github": ["https://github.com/bitcoin/bitcoin"]}
            },
            "market_data": {
                "current_price": {"inr": 5600000.0, "cad": 91000.0},
                "market_cap": {"inr": 1.1e14, "cad": 1.8e12},
                "high_24h": {"inr": 5700000.0, "cad": 92000.0},
                "low_24h": {"inr": 5500000.0, "cad": 90000.0},
                "total_volume": {"inr": 2.0e12, "cad": 3.2e10},
                "price_change_percentage_24h": 1.5,
                "circulating_supply": 19700000.0,
                "total_supply": 21000000.0
            }
        }))
        .map_err(|e| Error::InternalError(e.to_string()))?;

        Ok(detail)
    }
}
