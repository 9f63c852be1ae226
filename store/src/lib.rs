mod cache;
mod config;
mod error;
mod key;
mod observer;

pub use cache::QueryCache;
pub use config::CacheConfig;
pub use error::StoreError;
pub use key::QueryKey;
pub use observer::{QueryObserver, QueryState};
