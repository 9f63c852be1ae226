use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid query key: {0}")]
    InvalidKey(String),
}

impl From<StoreError> for common::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConfigError(msg) => common::Error::ConfigError(msg),
            StoreError::InvalidKey(msg) => common::Error::ParseError(msg),
        }
    }
}
