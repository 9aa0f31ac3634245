use thiserror::Error;

/// Errors surfaced by the market data layer
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid profile for {ticker}: {reason}")]
    InvalidProfile { ticker: String, reason: String },

    #[error("invalid bar on {date}: {reason}")]
    InvalidBar { date: chrono::NaiveDate, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for MarketDataError {
    fn from(err: config::ConfigError) -> Self {
        MarketDataError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarketDataError>;
