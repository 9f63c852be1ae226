use thiserror::Error;

/// Upstream resource a fetch was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Coins,
    Categories,
    CoinDetails,
}

impl Resource {
    /// Static message shown to users when the resource could not be loaded
    pub fn view_message(&self) -> &'static str {
        match self {
            Resource::Coins => "Failed to load market data. The API might be rate limited.",
            Resource::Categories => "Error loading categories",
            Resource::CoinDetails => "Coin not found",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Coins => write!(f, "coins"),
            Resource::Categories => write!(f, "categories"),
            Resource::CoinDetails => write!(f, "coin details"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Any upstream failure: transport, non-success status or undecodable body
    #[error("failed to fetch {0}")]
    Fetch(Resource),

    #[error("Parsing error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
