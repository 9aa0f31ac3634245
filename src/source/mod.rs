pub mod validator;

use chrono::{Local, NaiveDateTime};

use crate::api::alphavantage::{window_start, DAILY_REQUEST_LIMIT};
use crate::api::AlphaVantageClient;
use crate::config::AppConfig;
use crate::error::{MarketDataError, Result};
use crate::models::{DataSource, PriceBar};
use crate::synthetic::SyntheticSeriesGenerator;

pub use validator::BarValidator;

/// Bars plus the origin they were loaded from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub bars: Vec<PriceBar>,
    pub source: DataSource,
    pub limit_note: String,
}

impl LoadedSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn source_label(&self) -> &'static str {
        self.source.label()
    }

    pub fn limit_note(&self) -> &str {
        &self.limit_note
    }
}

/// Loads daily bars from the configured source
///
/// Both sources yield the same `PriceBar` shape, sorted ascending by date.
pub struct MarketDataService {
    source: DataSource,
    generator: SyntheticSeriesGenerator,
    live: Option<AlphaVantageClient>,
    validator: BarValidator,
}

impl MarketDataService {
    /// Service backed by the synthetic generator
    pub fn synthetic(generator: SyntheticSeriesGenerator) -> Self {
        Self {
            source: DataSource::Synthetic,
            generator,
            live: None,
            validator: BarValidator::new(),
        }
    }

    /// Service backed by the Alpha Vantage API
    pub fn live(client: AlphaVantageClient) -> Self {
        Self {
            source: DataSource::Live,
            generator: SyntheticSeriesGenerator::new(),
            live: Some(client),
            validator: BarValidator::new(),
        }
    }

    /// Build the service selected by `config.data_source`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        match config.data_source {
            DataSource::Synthetic => Ok(Self::synthetic(SyntheticSeriesGenerator::new())),
            DataSource::Live => {
                let api_key = config.alpha_vantage_api_key.clone().ok_or_else(|| {
                    MarketDataError::Config(
                        "alpha_vantage_api_key is required for the live data source".to_string(),
                    )
                })?;
                let client = AlphaVantageClient::with_base_url(
                    api_key,
                    config.alpha_vantage_base_url.clone(),
                    config.daily_request_limit,
                )
                .map_err(|e| MarketDataError::Config(e.to_string()))?;
                Ok(Self::live(client))
            }
        }
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Load bars for the trailing window ending now
    pub async fn load(&self, ticker: &str, days_back: i64) -> Result<LoadedSeries> {
        self.load_at(ticker, days_back, Local::now().naive_local()).await
    }

    /// Load bars for the trailing window ending at `now`
    ///
    /// A failing live fetch is logged and yields an empty series.
    pub async fn load_at(
        &self,
        ticker: &str,
        days_back: i64,
        now: NaiveDateTime,
    ) -> Result<LoadedSeries> {
        let bars = match (&self.source, &self.live) {
            (DataSource::Live, Some(client)) => {
                let window = u32::try_from(days_back).map_err(|_| {
                    MarketDataError::InvalidArgument(format!(
                        "days_back must not be negative, got {}",
                        days_back
                    ))
                })?;
                if window_start(now, window).is_none() {
                    return Err(MarketDataError::InvalidArgument(format!(
                        "{}-day window before {} is out of range",
                        window, now
                    )));
                }

                match client.get_daily(ticker, window, now).await {
                    Ok(bars) => self.drop_invalid(bars),
                    Err(e) => {
                        tracing::error!("Error fetching data for {}: {:#}", ticker, e);
                        Vec::new()
                    }
                }
            }
            _ => {
                let bars = self.generator.generate(ticker, days_back, now.date())?;
                for bar in &bars {
                    self.validator.validate(bar)?;
                }
                bars
            }
        };

        Ok(LoadedSeries {
            bars,
            source: self.source,
            limit_note: self.limit_note(),
        })
    }

    /// Usage limit note for the active source
    pub fn limit_note(&self) -> String {
        let daily_limit = self
            .live
            .as_ref()
            .map(|client| client.daily_limit())
            .unwrap_or(DAILY_REQUEST_LIMIT);
        self.source.limit_note(daily_limit)
    }

    fn drop_invalid(&self, bars: Vec<PriceBar>) -> Vec<PriceBar> {
        let total = bars.len();
        let valid: Vec<PriceBar> = bars
            .into_iter()
            .filter(|bar| match self.validator.validate(bar) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Dropping bar: {}", e);
                    false
                }
            })
            .collect();

        if valid.len() < total {
            tracing::warn!("{} of {} bars failed validation", total - valid.len(), total);
        }
        valid
    }
}
