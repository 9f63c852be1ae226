use crate::StoreError;
use common::models::Currency;

/// Cache key: the operation name plus exactly the parameters it was called with.
///
/// Coin details are deliberately not currency-scoped since the record
/// carries every currency's figures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Coins { page: u32, currency: Currency },
    Categories,
    CoinDetails { id: String },
}

impl QueryKey {
    pub fn coins(page: u32, currency: Currency) -> Result<Self, StoreError> {
        if page == 0 {
            return Err(StoreError::InvalidKey("Page numbers start at 1".to_string()));
        }
        Ok(QueryKey::Coins { page, currency })
    }

    pub fn categories() -> Self {
        QueryKey::Categories
    }

    pub fn coin_details(id: &str) -> Result<Self, StoreError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(StoreError::InvalidKey("Coin id must not be empty".to_string()));
        }
        Ok(QueryKey::CoinDetails { id: id.to_string() })
    }

    pub fn operation(&self) -> &'static str {
        match self {
            QueryKey::Coins { .. } => "coins",
            QueryKey::Categories => "categories",
            QueryKey::CoinDetails { .. } => "coin",
        }
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKey::Coins { page, currency } => {
                write!(f, "{}/{}/{}", self.operation(), page, currency)
            }
            QueryKey::Categories => write!(f, "{}", self.operation()),
            QueryKey::CoinDetails { id } => write!(f, "{}/{}", self.operation(), id),
        }
    }
}
