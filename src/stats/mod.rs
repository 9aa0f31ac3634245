use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::models::PriceBar;

/// Direction of the close-to-close change over the window
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// Summary of a loaded series: the latest bar plus the period change
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryStats {
    pub ticker: String,
    pub last_date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
    pub price_change: f64,
    pub pct_change: f64,
    pub trend: Trend,
}

impl SummaryStats {
    /// Compute stats for ascending `bars`; `None` when there are none
    pub fn from_bars(ticker: &str, bars: &[PriceBar]) -> Option<Self> {
        let oldest = bars.first()?;
        let latest = bars.last()?;

        let price_change = latest.close - oldest.close;
        let pct_change = if oldest.close != 0.0 {
            price_change / oldest.close * 100.0
        } else {
            0.0
        };
        let trend = if price_change > 0.0 {
            Trend::Up
        } else {
            Trend::Down
        };

        Some(Self {
            ticker: ticker.to_string(),
            last_date: latest.date,
            open: latest.open,
            close: latest.close,
            high: latest.high,
            low: latest.low,
            volume: latest.volume,
            price_change,
            pct_change,
            trend,
        })
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats: {}", self.ticker)?;
        writeln!(f, "{:<20} {}", "Last date:", self.last_date.format("%Y-%m-%d"))?;
        writeln!(f, "{:<20} ${:.2}", "Opening price:", self.open)?;
        writeln!(f, "{:<20} ${:.2}", "Closing price:", self.close)?;
        writeln!(f, "{:<20} ${:.2}", "Highest price:", self.high)?;
        writeln!(f, "{:<20} ${:.2}", "Lowest price:", self.low)?;
        writeln!(f, "{:<20} {}", "Volume:", group_thousands(self.volume))?;
        write!(
            f,
            "{:<20} ${:.2} ({:.2}%)",
            "Changes by period:", self.price_change, self.pct_change
        )
    }
}

/// Format an integer with comma thousands separators
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
