use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    models::{CategorySummary, CoinDetail, CoinSummary, Currency},
    Error as CommonError,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use store::QueryState;
use tracing::{error, warn};

use crate::service::MarketService;
use crate::view::{CoinStats, MarketPage};

pub const SERVICE_NAME: &str = "coinlens-api";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type SharedService = Arc<MarketService>;

// Create a wrapper for our common::Error type
pub struct ApiError(CommonError);

impl From<CommonError> for ApiError {
    fn from(err: CommonError) -> Self {
        ApiError(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

// Convert our API error wrapper to an Axum response
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.0.to_string();
        let (status, message) = match &self.0 {
            CommonError::Fetch(resource) => {
                warn!("Upstream fetch failed: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    resource.view_message().to_string(),
                )
            }
            CommonError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            CommonError::ParseError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CommonError::ConfigError(msg) | CommonError::InternalError(msg) => {
                error!("Internal failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                detail,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

pub async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": VERSION,
        "api_version": "v1",
        "dependencies": {"coingecko_api": "v3"},
    }))
}

fn parse_page(page: Option<u32>) -> Result<u32, ApiError> {
    match page.unwrap_or(1) {
        0 => Err(CommonError::ParseError("Page numbers start at 1".to_string()).into()),
        page => Ok(page),
    }
}

#[derive(Debug, Deserialize)]
pub struct CoinsQuery {
    pub page_num: Option<u32>,
    pub vs_currency: Option<String>,
}

// Return one page of coins, priced in the requested or selected currency
pub async fn list_coins(
    State(service): State<SharedService>,
    Query(query): Query<CoinsQuery>,
) -> Result<Json<Vec<CoinSummary>>, ApiError> {
    let page = parse_page(query.page_num)?;
    let currency = query
        .vs_currency
        .as_deref()
        .map(str::parse::<Currency>)
        .transpose()?;

    let coins = service.list_coins(page, currency).await?;
    Ok(Json(coins))
}

pub async fn get_coin(
    State(service): State<SharedService>,
    Path(coin_id): Path<String>,
) -> Result<Json<CoinDetail>, ApiError> {
    let coin = service.coin_details(Some(&coin_id)).await?;
    Ok(Json(coin))
}

pub async fn list_categories(
    State(service): State<SharedService>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrencyResponse {
    pub currency: Currency,
    pub iso_code: String,
    pub locale: String,
}

impl From<Currency> for CurrencyResponse {
    fn from(currency: Currency) -> Self {
        Self {
            currency,
            iso_code: currency.iso_code().to_string(),
            locale: currency.locale().to_string(),
        }
    }
}

pub async fn get_currency(State(service): State<SharedService>) -> Json<CurrencyResponse> {
    Json(service.currency().into())
}

#[derive(Debug, Deserialize)]
pub struct SetCurrency {
    pub currency: String,
}

pub async fn set_currency(
    State(service): State<SharedService>,
    Json(body): Json<SetCurrency>,
) -> Result<Json<CurrencyResponse>, ApiError> {
    let currency: Currency = body.currency.parse()?;
    service.set_currency(currency);
    Ok(Json(currency.into()))
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    pub page: Option<u32>,
}

// Formatted market table in the selected currency
pub async fn market_overview(
    State(service): State<SharedService>,
    Query(query): Query<MarketQuery>,
) -> Result<Json<MarketPage>, ApiError> {
    let page = parse_page(query.page)?;
    let market = service.market_overview(page).await?;
    Ok(Json(market))
}

/// Tri-state of an observed query: `idle`, `loading`, `success` or `error`
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryStateResponse<T> {
    pub status: String,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> From<QueryState<T>> for QueryStateResponse<T> {
    fn from(state: QueryState<T>) -> Self {
        let (status, data, error) = match state {
            QueryState::Idle => ("idle", None, None),
            QueryState::Loading => ("loading", None, None),
            QueryState::Success(data) => ("success", Some(data), None),
            QueryState::Error(CommonError::Fetch(resource)) => {
                ("error", None, Some(resource.view_message().to_string()))
            }
            QueryState::Error(err) => ("error", None, Some(err.to_string())),
        };

        Self {
            status: status.to_string(),
            data,
            error,
        }
    }
}

// Read the observed listing; passing a page starts observing that page
pub async fn market_state(
    State(service): State<SharedService>,
    Query(query): Query<MarketQuery>,
) -> Result<Json<QueryStateResponse<Vec<CoinSummary>>>, ApiError> {
    if query.page.is_some() {
        let page = parse_page(query.page)?;
        service.observe_coins(page);
    }

    Ok(Json(service.market_state().into()))
}

pub async fn coin_stats(
    State(service): State<SharedService>,
    Path(coin_id): Path<String>,
) -> Result<Json<CoinStats>, ApiError> {
    let stats = service.coin_stats(Some(&coin_id)).await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConnector;
    use common::CurrencyContext;
    use store::CacheConfig;

    async fn spawn_app(connector: Arc<MockConnector>) -> String {
        let service = Arc::new(MarketService::new(
            connector,
            CurrencyContext::new(Currency::Inr),
            &CacheConfig::default(),
        ));
        let app = crate::app(service);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::Server::from_tcp(listener)
                .unwrap()
                .serve(app.into_make_service())
                .await
                .unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn health_and_version() {
        let base = spawn_app(Arc::new(MockConnector::new())).await;

        let health: HealthResponse = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, SERVICE_NAME);

        let version: serde_json::Value = reqwest::get(format!("{}/version", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(version["api_version"], "v1");
        assert_eq!(version["dependencies"]["coingecko_api"], "v3");
    }

    #[tokio::test]
    async fn coins_default_to_first_page_and_selected_currency() {
        let connector = Arc::new(MockConnector::new());
        let base = spawn_app(connector.clone()).await;

        let coins: Vec<CoinSummary> = reqwest::get(format!("{}/api/coins", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(coins.len(), 10);

        reqwest::get(format!("{}/api/coins?page_num=4&vs_currency=CAD", base))
            .await
            .unwrap();
        assert_eq!(connector.calls(), vec!["coins/1/inr", "coins/4/cad"]);
    }

    #[tokio::test]
    async fn invalid_parameters_are_rejected() {
        let connector = Arc::new(MockConnector::new());
        let base = spawn_app(connector.clone()).await;

        let response = reqwest::get(format!("{}/api/coins?page_num=0", base))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let response = reqwest::get(format!("{}/api/coins?vs_currency=usd", base))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        assert!(connector.calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_failures_map_to_view_messages() {
        let connector = Arc::new(MockConnector::new());
        connector.set_failing(true);
        let base = spawn_app(connector).await;

        for (path, message) in [
            (
                "/api/coins",
                "Failed to load market data. The API might be rate limited.",
            ),
            ("/api/categories", "Error loading categories"),
            ("/api/coins/bitcoin", "Coin not found"),
        ] {
            let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
            let body: ErrorResponse = response.json().await.unwrap();
            assert_eq!(body.error, message);
        }

        // the service keeps answering after failures
        let response = reqwest::get(format!("{}/health", base)).await.unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn blank_coin_id_is_not_found_without_upstream_call() {
        let connector = Arc::new(MockConnector::new());
        let base = spawn_app(connector.clone()).await;

        let response = reqwest::get(format!("{}/api/coins/%20/stats", base))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json().await.unwrap();
        assert_eq!(body.error, "Coin not found");
        assert!(connector.calls().is_empty());
    }

    #[tokio::test]
    async fn currency_selection_drives_formatted_views() {
        let connector = Arc::new(MockConnector::new());
        let base = spawn_app(connector.clone()).await;
        let client = reqwest::Client::new();

        let current: CurrencyResponse = client
            .get(format!("{}/api/currency", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(current.currency, Currency::Inr);
        assert_eq!(current.locale, "en-IN");

        let market: serde_json::Value = client
            .get(format!("{}/api/market?page=1", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(market["currency"], "inr");
        assert_eq!(market["rows"][0]["price"], "₹56,00,000.00");
        assert_eq!(market["rows"][0]["change_24h"]["direction"], "down");
        assert_eq!(market["rows"][0]["change_24h"]["magnitude"], "1.00%");

        let updated: CurrencyResponse = client
            .put(format!("{}/api/currency", base))
            .json(&serde_json::json!({"currency": "cad"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(updated.iso_code, "CAD");
        assert_eq!(updated.locale, "en-CA");

        let stats: serde_json::Value = client
            .get(format!("{}/api/coins/bitcoin/stats", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(stats["price"], "$91,000.00");
        assert_eq!(stats["high_24h"], "$92,000.00");
        assert_eq!(stats["change_24h"]["direction"], "up");
        assert_eq!(stats["links"]["twitter"], "https://twitter.com/bitcoin");
    }

    #[tokio::test]
    async fn observed_market_state_settles_on_requested_page() {
        let connector = Arc::new(MockConnector::new());
        let base = spawn_app(connector.clone()).await;
        let url = format!("{}/api/market/state", base);

        let idle: QueryStateResponse<Vec<CoinSummary>> =
            reqwest::get(&url).await.unwrap().json().await.unwrap();
        assert_eq!(idle.status, "idle");

        let started: QueryStateResponse<Vec<CoinSummary>> =
            reqwest::get(format!("{}?page=2", url))
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
        assert!(started.status == "loading" || started.status == "success");

        let mut settled = started;
        for _ in 0..50 {
            if settled.status == "success" {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            settled = reqwest::get(&url).await.unwrap().json().await.unwrap();
        }

        assert_eq!(settled.status, "success");
        assert_eq!(settled.data.unwrap()[0].market_cap_rank, Some(11));
        assert_eq!(connector.calls(), vec!["coins/2/inr"]);
    }

    #[tokio::test]
    async fn observed_market_failure_reports_view_message() {
        let connector = Arc::new(MockConnector::new());
        connector.set_failing(true);
        let base = spawn_app(connector).await;
        let url = format!("{}/api/market/state", base);

        reqwest::get(format!("{}?page=1", url)).await.unwrap();

        let mut state: QueryStateResponse<Vec<CoinSummary>> =
            reqwest::get(&url).await.unwrap().json().await.unwrap();
        for _ in 0..50 {
            if state.status == "error" {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            state = reqwest::get(&url).await.unwrap().json().await.unwrap();
        }

        assert_eq!(state.status, "error");
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to load market data. The API might be rate limited.")
        );
    }

    #[tokio::test]
    async fn unsupported_currency_selection_is_rejected() {
        let base = spawn_app(Arc::new(MockConnector::new())).await;
        let response = reqwest::Client::new()
            .put(format!("{}/api/currency", base))
            .json(&serde_json::json!({"currency": "eur"}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
