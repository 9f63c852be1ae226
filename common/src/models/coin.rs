use crate::models::Currency;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recent price trend attached to market listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<f64>,
}

/// One row of the paged market listing. Monetary fields are denominated in
/// the currency the page was requested with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinSummary {
    /// Unique identifier for the coin (e.g., "bitcoin", "ethereum")
    pub id: String,
    /// Ticker symbol as reported upstream (e.g., "btc")
    pub symbol: String,
    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub high_24h: Option<f64>,
    #[serde(default)]
    pub low_24h: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Option<Sparkline>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CoinImage {
    #[serde(default)]
    pub thumb: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CoinDescription {
    #[serde(default)]
    pub en: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RepositoryLinks {
    #[serde(default)]
    pub github: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CoinLinks {
    #[serde(default)]
    pub homepage: Vec<String>,
    #[serde(default)]
    pub twitter_screen_name: Option<String>,
    #[serde(default)]
    pub repos_url: RepositoryLinks,
}

fn first_non_empty(urls: &[String]) -> Option<&str> {
    urls.iter().map(|u| u.trim()).find(|u| !u.is_empty())
}

impl CoinLinks {
    pub fn homepage(&self) -> Option<&str> {
        first_non_empty(&self.homepage)
    }

    pub fn twitter_url(&self) -> Option<String> {
        self.twitter_screen_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| format!("https://twitter.com/{}", name))
    }

    pub fn github(&self) -> Option<&str> {
        first_non_empty(&self.repos_url.github)
    }
}

/// Per-currency figures keyed by lowercase currency code
type CurrencyMap = HashMap<String, Option<f64>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetailMarketData {
    #[serde(default)]
    pub current_price: CurrencyMap,
    #[serde(default)]
    pub market_cap: CurrencyMap,
    #[serde(default)]
    pub high_24h: CurrencyMap,
    #[serde(default)]
    pub low_24h: CurrencyMap,
    #[serde(default)]
    pub total_volume: CurrencyMap,
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub max_supply: Option<f64>,
    #[serde(default)]
    pub sparkline_7d: Option<Sparkline>,
}

fn lookup(map: &CurrencyMap, currency: Currency) -> Option<f64> {
    map.get(currency.code()).copied().flatten()
}

impl DetailMarketData {
    pub fn price_in(&self, currency: Currency) -> Option<f64> {
        lookup(&self.current_price, currency)
    }

    pub fn market_cap_in(&self, currency: Currency) -> Option<f64> {
        lookup(&self.market_cap, currency)
    }

    pub fn high_24h_in(&self, currency: Currency) -> Option<f64> {
        lookup(&self.high_24h, currency)
    }

    pub fn low_24h_in(&self, currency: Currency) -> Option<f64> {
        lookup(&self.low_24h, currency)
    }

    pub fn volume_in(&self, currency: Currency) -> Option<f64> {
        lookup(&self.total_volume, currency)
    }
}

/// Full record for a single coin. Carries figures for every currency at
/// once, so it is looked up by the live currency instead of being refetched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub image: CoinImage,
    // upstream occasionally emits null entries here
    #[serde(default)]
    pub categories: Vec<Option<String>>,
    #[serde(default)]
    pub description: CoinDescription,
    #[serde(default)]
    pub links: CoinLinks,
    #[serde(default)]
    pub market_data: DetailMarketData,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CoinDetail {
    /// Category tags with null and blank entries removed
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .filter_map(|c| c.as_deref())
            .filter(|c| !c.trim().is_empty())
    }
}
