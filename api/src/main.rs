mod config;
mod handler;
mod service;
#[cfg(test)]
mod testing;
mod view;

use axum::{routing::get, Router};
use common::CurrencyContext;
use connectors::{coingecko::CoinGeckoConnector, CoinGeckoConfig};
use handler::SharedService;
use service::MarketService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Router with every API route mounted
pub fn app(service: SharedService) -> Router {
    // Create CORS middleware
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handler::health))
        .route("/version", get(handler::version))
        .route("/api/coins", get(handler::list_coins))
        .route("/api/coins/:id", get(handler::get_coin))
        .route("/api/coins/:id/stats", get(handler::coin_stats))
        .route("/api/categories", get(handler::list_categories))
        .route(
            "/api/currency",
            get(handler::get_currency).put(handler::set_currency),
        )
        .route("/api/market", get(handler::market_overview))
        .route("/api/market/state", get(handler::market_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting CoinLens API");

    // Load configuration from environment
    let api_config = config::ApiConfig::from_env();
    let coingecko_config = CoinGeckoConfig::from_env()
        .map_err(|e| format!("Failed to load CoinGecko configuration: {}", e))?;
    let cache_config = store::CacheConfig::from_env()
        .map_err(|e| format!("Failed to load cache configuration: {}", e))?;

    info!(
        "Upstream {} (timeout {}s), cache TTL {}s, default currency {}",
        coingecko_config.base_url,
        coingecko_config.timeout_secs,
        cache_config.ttl.as_secs(),
        api_config.default_currency.iso_code()
    );

    let connector = Arc::new(
        CoinGeckoConnector::new(coingecko_config)
            .map_err(|e| format!("Failed to create CoinGecko connector: {}", e))?,
    );

    let service = Arc::new(MarketService::new(
        connector,
        CurrencyContext::new(api_config.default_currency),
        &cache_config,
    ));
    service.clone().follow_currency();

    let app = app(service);

    // Start server
    let addr: SocketAddr = api_config
        .bind_address()
        .parse()
        .map_err(|e| format!("Invalid bind address {}: {}", api_config.bind_address(), e))?;
    info!("Listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
