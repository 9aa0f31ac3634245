use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data
///
/// Field order matches the CSV export column order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// Baseline parameters for synthesizing a ticker's price path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TickerProfile {
    pub base_price: f64,
    pub volatility: f64,
    pub drift: f64,
}

impl TickerProfile {
    pub const fn new(base_price: f64, volatility: f64, drift: f64) -> Self {
        Self {
            base_price,
            volatility,
            drift,
        }
    }
}

impl Default for TickerProfile {
    fn default() -> Self {
        Self::new(100.0, 0.02, 0.0004)
    }
}

/// Where a series came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Synthetic,
}

impl DataSource {
    /// Human readable origin shown next to the data
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Live => "Using Alpha Vantage API",
            DataSource::Synthetic => "Using pre-generated data",
        }
    }

    /// Usage limit note for the source, given the live daily request quota
    pub fn limit_note(&self, daily_limit: u32) -> String {
        match self {
            DataSource::Live => format!("(Max: {} requests/day)", daily_limit),
            DataSource::Synthetic => "API limitations not applicable".to_string(),
        }
    }
}

impl std::str::FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(DataSource::Live),
            "synthetic" => Ok(DataSource::Synthetic),
            other => Err(format!("unknown data source: {}", other)),
        }
    }
}
