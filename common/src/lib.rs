pub mod context;
pub mod error;
pub mod format;
pub mod models;

pub use context::CurrencyContext;
pub use error::{Error, Resource};
pub type Result<T> = std::result::Result<T, Error>;
