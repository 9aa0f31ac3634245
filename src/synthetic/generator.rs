use std::collections::HashMap;
use std::f64::consts::PI;

use chrono::{Days, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::calendar::trading_days;
use super::profiles::{check_profile, ticker_code_sum, KNOWN_PROFILES};
use crate::error::{MarketDataError, Result};
use crate::models::{PriceBar, TickerProfile};

/// Lowest close the random walk may reach
const PRICE_FLOOR: f64 = 0.1;
/// Length of the seasonal cycle, in trading days
const CYCLE_PERIOD: f64 = 30.0;
/// Cycle amplitude as a fraction of the base price
const CYCLE_AMPLITUDE: f64 = 0.02;
/// Share of the cycle amplitude applied to each close
const CYCLE_WEIGHT: f64 = 0.1;
/// Fraction of the daily range placed above and below the close
const RANGE_SPREAD: f64 = 0.6;

/// Generates deterministic daily OHLCV series per ticker
///
/// Every call builds its own random stream seeded from the ticker symbol, so
/// the same ticker, window and reference date always give the same bars and
/// a shared generator can be used from several threads.
#[derive(Debug, Clone)]
pub struct SyntheticSeriesGenerator {
    profiles: HashMap<String, TickerProfile>,
    fallback: TickerProfile,
}

impl SyntheticSeriesGenerator {
    /// Create a generator with the built-in ticker table
    pub fn new() -> Self {
        Self {
            profiles: KNOWN_PROFILES
                .iter()
                .map(|(ticker, profile)| (ticker.to_string(), *profile))
                .collect(),
            fallback: TickerProfile::default(),
        }
    }

    /// Add or replace the profile for a ticker
    pub fn with_profile(mut self, ticker: impl Into<String>, profile: TickerProfile) -> Self {
        self.profiles.insert(ticker.into(), profile);
        self
    }

    /// Profile used for `ticker` (exact, case-sensitive match)
    pub fn profile_for(&self, ticker: &str) -> &TickerProfile {
        self.profiles.get(ticker).unwrap_or(&self.fallback)
    }

    /// Generate bars for the trailing window ending at the local date
    pub fn generate_today(&self, ticker: &str, days_back: i64) -> Result<Vec<PriceBar>> {
        self.generate(ticker, days_back, Local::now().date_naive())
    }

    /// Generate one bar per business day in `[today - days_back, today]`
    ///
    /// # Arguments
    /// * `ticker` - Symbol to look up; unknown symbols use the fallback profile
    /// * `days_back` - Trailing window in calendar days, must not be negative
    /// * `today` - Last day of the window
    ///
    /// # Returns
    /// Bars in ascending date order, or an error without partial output
    ///
    /// The stream is `StdRng` seeded with the ticker's character-code sum. It
    /// is reproducible across calls and threads, but its values do not match
    /// numpy's MT19937 stream for the same seed.
    pub fn generate(&self, ticker: &str, days_back: i64, today: NaiveDate) -> Result<Vec<PriceBar>> {
        let days_back = u32::try_from(days_back).map_err(|_| {
            MarketDataError::InvalidArgument(format!(
                "days_back must be between 0 and {}, got {}",
                u32::MAX,
                days_back
            ))
        })?;
        if today.checked_sub_days(Days::new(days_back as u64)).is_none() {
            return Err(MarketDataError::InvalidArgument(format!(
                "{}-day window before {} is out of range",
                days_back, today
            )));
        }

        let profile = *self.profile_for(ticker);
        check_profile(&profile).map_err(|reason| MarketDataError::InvalidProfile {
            ticker: ticker.to_string(),
            reason,
        })?;
        let returns = Normal::new(profile.drift, profile.volatility).map_err(|e| {
            MarketDataError::InvalidProfile {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            }
        })?;

        let dates = trading_days(today, days_back);
        if dates.is_empty() {
            tracing::debug!("No business days for {} in {}-day window", ticker, days_back);
            return Ok(Vec::new());
        }

        let code_sum = ticker_code_sum(ticker);
        let mut rng = StdRng::seed_from_u64(code_sum);

        let closes = synthesize_closes(&profile, dates.len(), &returns, &mut rng);
        let bars = derive_bars(&profile, dates, &closes, code_sum * 1000, &mut rng);

        tracing::debug!(
            "Generated {} synthetic bars for {} ({} days back from {})",
            bars.len(),
            ticker,
            days_back,
            today
        );

        Ok(bars)
    }
}

impl Default for SyntheticSeriesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Random walk with drift plus a damped 30-day cycle, floored at 0.1
fn synthesize_closes(
    profile: &TickerProfile,
    n: usize,
    returns: &Normal<f64>,
    rng: &mut StdRng,
) -> Vec<f64> {
    let mut closes = Vec::with_capacity(n);
    closes.push(profile.base_price);

    for i in 1..n {
        let daily_return = returns.sample(rng);
        let cycle =
            CYCLE_AMPLITUDE * profile.base_price * (2.0 * PI * i as f64 / CYCLE_PERIOD).sin();

        let previous = closes[i - 1];
        let close = (previous * (1.0 + daily_return) + cycle * CYCLE_WEIGHT).max(PRICE_FLOOR);
        closes.push(close);
    }

    closes
}

/// Derive open/high/low/volume around each close
///
/// Draw order: open jitter for every row (row 0's is unused), one extra draw
/// for row 0's open, then range jitter, then volume jitter.
fn derive_bars(
    profile: &TickerProfile,
    dates: Vec<NaiveDate>,
    closes: &[f64],
    base_volume: u64,
    rng: &mut StdRng,
) -> Vec<PriceBar> {
    let n = closes.len();

    let open_jitter: Vec<f64> = (0..n).map(|_| rng.gen_range(-0.01..0.01)).collect();
    let first_open_jitter: f64 = rng.gen_range(-0.01..0.01);
    let range_pct: Vec<f64> = (0..n).map(|_| rng.gen_range(0.01..0.03)).collect();
    let volume_pct: Vec<f64> = (0..n).map(|_| rng.gen_range(0.7..1.3)).collect();

    dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let close = closes[i];
            let open = if i == 0 {
                profile.base_price * (1.0 + first_open_jitter)
            } else {
                closes[i - 1] * (1.0 + open_jitter[i])
            };

            let daily_range = close * range_pct[i];
            let high = (close + daily_range * RANGE_SPREAD).max(open).max(close);
            let low = (close - daily_range * RANGE_SPREAD).min(open).min(close);

            let volume = (base_volume as f64 * volume_pct[i]).round() as u64;

            PriceBar {
                date,
                open: round2(open),
                high: round2(high),
                low: round2(low),
                close: round2(close),
                adj_close: round2(close),
                volume,
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
