mod category;
mod coin;
mod currency;

pub use category::CategorySummary;
pub use coin::{
    CoinDetail, CoinDescription, CoinImage, CoinLinks, CoinSummary, DetailMarketData,
    RepositoryLinks, Sparkline,
};
pub use currency::Currency;
