use serde::{Deserialize, Serialize};

/// Category row as returned by the upstream categories listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    /// Aggregate market capitalization, quoted in USD by the upstream service
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_change_24h: Option<f64>,
    /// Free-text description
    #[serde(default)]
    pub content: Option<String>,
    /// Image URLs of the three largest constituents
    #[serde(default)]
    pub top_3_coins: Vec<String>,
    #[serde(default)]
    pub volume_24h: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
