use serde::Deserialize;

use crate::api::alphavantage::{ALPHA_VANTAGE_API_BASE, DAILY_REQUEST_LIMIT};
use crate::error::Result;
use crate::models::DataSource;

pub const DEFAULT_TICKER: &str = "GOOGL";
pub const DEFAULT_DAYS: i64 = 30;
const ENV_PREFIX: &str = "STOCKDASH";
const CONFIG_FILE: &str = "stockdash";

/// Application settings
///
/// Sources, lowest priority first: built-in defaults, an optional
/// `stockdash.toml` in the working directory, `STOCKDASH_*` environment
/// variables.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub daily_request_limit: u32,
    pub default_ticker: String,
    pub default_days: i64,
    pub data_source: DataSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            alpha_vantage_base_url: ALPHA_VANTAGE_API_BASE.to_string(),
            daily_request_limit: DAILY_REQUEST_LIMIT,
            default_ticker: DEFAULT_TICKER.to_string(),
            default_days: DEFAULT_DAYS,
            data_source: DataSource::Synthetic,
        }
    }
}

impl AppConfig {
    /// Load from `stockdash.toml` and the environment
    pub fn load() -> Result<Self> {
        Self::build(config::File::with_name(CONFIG_FILE).required(false))
    }

    fn build<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = AppConfig::default();

        let settings = config::Config::builder()
            .set_default("alpha_vantage_base_url", defaults.alpha_vantage_base_url)?
            .set_default("daily_request_limit", defaults.daily_request_limit as i64)?
            .set_default("default_ticker", defaults.default_ticker)?
            .set_default("default_days", defaults.default_days)?
            .set_default("data_source", "synthetic")?
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        tracing::debug!(
            "Loaded config: source={:?}, ticker={}, days={}",
            config.data_source,
            config.default_ticker,
            config.default_days
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(contents: &str) -> Result<AppConfig> {
        AppConfig::build(config::File::from_str(contents, FileFormat::Toml))
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("").unwrap();

        assert_eq!(config.default_ticker, "GOOGL");
        assert_eq!(config.default_days, 30);
        assert_eq!(config.data_source, DataSource::Synthetic);
        assert_eq!(config.daily_request_limit, 25);
        assert_eq!(config.alpha_vantage_base_url, "https://www.alphavantage.co");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = from_toml(
            r#"
            default_ticker = "NVDA"
            default_days = 180
            data_source = "live"
            alpha_vantage_api_key = "demo"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_ticker, "NVDA");
        assert_eq!(config.default_days, 180);
        assert_eq!(config.data_source, DataSource::Live);
        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("demo"));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result = from_toml(r#"data_source = "csv""#);
        assert!(result.is_err());
    }
}
