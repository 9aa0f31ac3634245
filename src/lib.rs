// Core modules
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod source;
pub mod stats;
pub mod synthetic;

// Re-export commonly used types
pub use error::{MarketDataError, Result};
pub use models::*;
pub use source::{LoadedSeries, MarketDataService};
pub use synthetic::SyntheticSeriesGenerator;
