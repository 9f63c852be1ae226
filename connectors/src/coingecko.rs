use crate::{CoinGeckoConfig, MarketDataConnector, PAGE_SIZE};
use async_trait::async_trait;
use common::{
    models::{CategorySummary, CoinDetail, CoinSummary, Currency},
    Error, Resource, Result,
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

const USER_AGENT: &str = concat!("coinlens/", env!("CARGO_PKG_VERSION"));

pub struct CoinGeckoConnector {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoConnector {
    pub fn new(config: CoinGeckoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            Error::ConfigError(format!("Invalid CoinGecko URL {}: {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                Error::ConfigError(format!("CoinGecko URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Issues a GET and decodes the body. Every failure mode collapses into
    /// `Error::Fetch(resource)`; the cause is only logged.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: Resource,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("Fetching {} from CoinGecko: {}", resource, url);

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("CoinGecko request for {} failed: {}", resource, e);
                Error::Fetch(resource)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("CoinGecko API error: {} - {}", status, error_text);
            return Err(Error::Fetch(resource));
        }

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse CoinGecko {} response: {}", resource, e);
            Error::Fetch(resource)
        })
    }
}

fn flag(value: bool) -> String {
    value.to_string()
}

#[async_trait]
impl MarketDataConnector for CoinGeckoConnector {
    async fn list_coins(&self, page: u32, currency: Currency) -> Result<Vec<CoinSummary>> {
        if page == 0 {
            return Err(Error::ParseError("Page numbers start at 1".to_string()));
        }

        let url = self.endpoint(&["coins", "markets"])?;
        let coins: Vec<CoinSummary> = self
            .get_json(
                Resource::Coins,
                url,
                &[
                    ("vs_currency", currency.code().to_string()),
                    ("order", "market_cap_desc".to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                    ("page", page.to_string()),
                    ("sparkline", flag(true)),
                ],
            )
            .await?;

        debug!(
            "Fetched {} coins for page {} in {}",
            coins.len(),
            page,
            currency.iso_code()
        );

        Ok(coins)
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let url = self.endpoint(&["coins", "categories"])?;
        self.get_json(Resource::Categories, url, &[]).await
    }

    async fn coin_details(&self, id: &str) -> Result<CoinDetail> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::NotFound("Coin not found".to_string()));
        }

        let url = self.endpoint(&["coins", id])?;
        self.get_json(
            Resource::CoinDetails,
            url,
            &[
                ("localization", flag(false)),
                ("tickers", flag(false)),
                ("market_data", flag(true)),
                ("community_data", flag(false)),
                ("developer_data", flag(false)),
                ("sparkline", flag(true)),
            ],
        )
        .await
    }
}
