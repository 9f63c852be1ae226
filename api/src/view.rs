//! Display-ready projections of upstream records, formatted for one currency.

use common::{
    format::{format_optional_currency, format_quantity, PriceChange},
    models::{CoinDetail, CoinSummary, Currency},
};
use serde::Serialize;

/// Maximum number of category tags shown on a coin page
const SHOWN_CATEGORIES: usize = 2;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarketRow {
    pub rank: Option<u32>,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: Option<String>,
    pub price: String,
    pub change_24h: Option<PriceChange>,
    pub market_cap: String,
    pub sparkline: Vec<f64>,
}

impl MarketRow {
    pub fn new(coin: &CoinSummary, currency: Currency) -> Self {
        Self {
            rank: coin.market_cap_rank,
            id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.to_uppercase(),
            image: coin.image.clone(),
            price: format_optional_currency(coin.current_price, currency),
            change_24h: coin.price_change_percentage_24h.map(PriceChange::new),
            market_cap: format_optional_currency(coin.market_cap, currency),
            sparkline: coin
                .sparkline_in_7d
                .as_ref()
                .map(|s| s.price.clone())
                .unwrap_or_default(),
        }
    }
}

/// One page of the market overview table
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarketPage {
    pub page: u32,
    pub currency: Currency,
    pub has_previous: bool,
    pub rows: Vec<MarketRow>,
}

impl MarketPage {
    pub fn new(page: u32, currency: Currency, coins: &[CoinSummary]) -> Self {
        Self {
            page,
            currency,
            has_previous: page > 1,
            rows: coins.iter().map(|c| MarketRow::new(c, currency)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoinLinksView {
    pub homepage: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
}

/// Detail panel for a single coin
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CoinStats {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub rank: Option<u32>,
    pub image: Option<String>,
    pub currency: Currency,
    pub price: String,
    pub change_24h: Option<PriceChange>,
    pub market_cap: String,
    pub volume_24h: String,
    pub high_24h: String,
    pub low_24h: String,
    pub circulating_supply: String,
    pub total_supply: String,
    pub categories: Vec<String>,
    pub description: Option<String>,
    pub links: CoinLinksView,
}

impl CoinStats {
    /// Projects `coin` into `currency`. The detail record holds every
    /// currency's figures, so this never needs a refetch.
    pub fn new(coin: &CoinDetail, currency: Currency) -> Self {
        let data = &coin.market_data;
        let symbol = coin.symbol.to_uppercase();

        Self {
            id: coin.id.clone(),
            name: coin.name.clone(),
            rank: coin.market_cap_rank,
            image: coin.image.large.clone(),
            currency,
            price: format_optional_currency(data.price_in(currency), currency),
            change_24h: data.price_change_percentage_24h.map(PriceChange::new),
            market_cap: format_optional_currency(data.market_cap_in(currency), currency),
            volume_24h: format_optional_currency(data.volume_in(currency), currency),
            high_24h: format_optional_currency(data.high_24h_in(currency), currency),
            low_24h: format_optional_currency(data.low_24h_in(currency), currency),
            circulating_supply: data
                .circulating_supply
                .map(|s| format!("{} {}", format_quantity(s), symbol))
                .unwrap_or_else(|| "N/A".to_string()),
            total_supply: data
                .total_supply
                .map(format_quantity)
                .unwrap_or_else(|| "N/A".to_string()),
            categories: coin
                .categories()
                .take(SHOWN_CATEGORIES)
                .map(str::to_string)
                .collect(),
            description: coin
                .description
                .en
                .clone()
                .filter(|d| !d.trim().is_empty()),
            links: CoinLinksView {
                homepage: coin.links.homepage().map(str::to_string),
                twitter: coin.links.twitter_url(),
                github: coin.links.github().map(str::to_string),
            },
            symbol,
        }
    }
}
