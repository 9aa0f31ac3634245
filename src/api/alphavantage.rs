use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::models::PriceBar;

pub const ALPHA_VANTAGE_API_BASE: &str = "https://www.alphavantage.co";
pub const DAILY_REQUEST_LIMIT: u32 = 25; // Free tier: 25 requests per day
const MAX_RETRIES: u32 = 3;
const SECONDS_PER_DAY: u64 = 86_400;

// Type alias for the rate limiter to simplify signatures
type AlphaVantageRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Alpha Vantage API client with a client-side daily quota
///
/// This struct is cloneable to allow sharing across async tasks.
/// All clones share the same rate limiter.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    daily_limit: u32,
    rate_limiter: Arc<AlphaVantageRateLimiter>,
}

/// Response from the TIME_SERIES_DAILY function
#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Time Series (Daily)", default)]
    time_series: BTreeMap<String, DailyEntry>,
}

/// One day of the series; Alpha Vantage sends numbers as strings
#[derive(Debug, Deserialize)]
struct DailyEntry {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

impl AlphaVantageClient {
    /// Create a client against the public API with the free-tier quota
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, ALPHA_VANTAGE_API_BASE, DAILY_REQUEST_LIMIT)
    }

    /// Create a client with a custom endpoint and daily request limit
    pub fn with_base_url(
        api_key: String,
        base_url: impl Into<String>,
        daily_limit: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        let burst = NonZeroU32::new(daily_limit).context("Daily request limit must be positive")?;
        let period = std::time::Duration::from_secs(SECONDS_PER_DAY) / daily_limit;
        let quota = Quota::with_period(period)
            .context("Daily request limit is too large")?
            .allow_burst(burst);

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            daily_limit,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Requests allowed per day by the client-side quota
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Make a quota-checked API request with retry logic
    async fn make_request(&self, symbol: &str) -> Result<reqwest::Response> {
        if self.rate_limiter.check().is_err() {
            anyhow::bail!("Alpha Vantage daily request quota exhausted");
        }

        let url = format!("{}/query", self.base_url);
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", "full"),
            ("apikey", self.api_key.as_str()),
        ];

        for attempt in 1..=MAX_RETRIES {
            match self.client.get(&url).query(&params).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let backoff_secs = 2u64.pow(attempt);
                        tracing::warn!(
                            "Alpha Vantage returned {}, retrying in {}s (attempt {}/{})",
                            status,
                            backoff_secs,
                            attempt,
                            MAX_RETRIES
                        );
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        continue;
                    }

                    // Other errors (4xx) - don't retry
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    anyhow::bail!("Alpha Vantage API error ({}): {}", status, error_text);
                }
                Err(e) if attempt < MAX_RETRIES => {
                    let backoff_secs = 2u64.pow(attempt);
                    tracing::warn!(
                        "Network error: {}, retrying in {}s (attempt {}/{})",
                        e,
                        backoff_secs,
                        attempt,
                        MAX_RETRIES
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                }
                Err(e) => anyhow::bail!("Network error after {} retries: {}", MAX_RETRIES, e),
            }
        }

        anyhow::bail!("Failed after {} retries", MAX_RETRIES)
    }

    /// Fetch daily bars for `symbol`
    ///
    /// # Arguments
    /// * `symbol` - Ticker symbol, passed through unchanged
    /// * `days_back` - Keep only bars within this many days of `now`; 0 keeps all
    /// * `now` - Reference time the window is measured from
    pub async fn get_daily(
        &self,
        symbol: &str,
        days_back: u32,
        now: NaiveDateTime,
    ) -> Result<Vec<PriceBar>> {
        tracing::info!("Fetching daily series for {} from Alpha Vantage", symbol);

        let response = self.make_request(symbol).await?;
        let body: DailySeriesResponse = response
            .json()
            .await
            .context("Failed to parse daily series response")?;

        let bars = normalize_daily_series(body, days_back, now)?;
        tracing::debug!("Received {} daily bars for {}", bars.len(), symbol);

        Ok(bars)
    }
}

/// Earliest timestamp inside a `days_back` window ending at `now`
///
/// `None` when the window reaches past the earliest representable date.
pub fn window_start(now: NaiveDateTime, days_back: u32) -> Option<NaiveDateTime> {
    Duration::try_days(days_back as i64).and_then(|span| now.checked_sub_signed(span))
}

/// Convert the raw response into ascending bars within the window
fn normalize_daily_series(
    body: DailySeriesResponse,
    days_back: u32,
    now: NaiveDateTime,
) -> Result<Vec<PriceBar>> {
    if let Some(message) = body.error_message {
        anyhow::bail!("{}", message);
    }

    if body.time_series.is_empty() {
        match body.information.or(body.note) {
            Some(detail) => anyhow::bail!("API returned no information: {}", detail),
            None => anyhow::bail!("API returned no information"),
        }
    }

    let cutoff = if days_back > 0 {
        match window_start(now, days_back) {
            Some(cutoff) => Some(cutoff),
            None => anyhow::bail!("{}-day window before {} is out of range", days_back, now),
        }
    } else {
        None
    };

    let mut bars = Vec::with_capacity(body.time_series.len());
    for (date, entry) in body.time_series {
        let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("Invalid date in series: {}", date))?;

        if let Some(cutoff) = cutoff {
            if date.and_time(NaiveTime::MIN) < cutoff {
                continue;
            }
        }

        bars.push(entry.into_bar(date)?);
    }

    bars.sort_by_key(|bar| bar.date);
    Ok(bars)
}

impl DailyEntry {
    fn into_bar(self, date: NaiveDate) -> Result<PriceBar> {
        let close = parse_number("close", &self.close)?;
        let volume = parse_number("volume", &self.volume)?;
        if volume < 0.0 {
            anyhow::bail!("Negative volume on {}: {}", date, self.volume);
        }

        Ok(PriceBar {
            date,
            open: parse_number("open", &self.open)?,
            high: parse_number("high", &self.high)?,
            low: parse_number("low", &self.low)?,
            close,
            adj_close: close,
            volume: volume.round() as u64,
        })
    }
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    let number = value
        .trim()
        .parse::<f64>()
        .with_context(|| format!("Invalid {} value: {}", field, value))?;
    if !number.is_finite() {
        anyhow::bail!("Invalid {} value: {}", field, value);
    }
    Ok(number)
}
