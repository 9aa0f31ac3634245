use crate::error::{MarketDataError, Result};
use crate::models::PriceBar;

/// Validates daily bars for sanity and correctness
pub struct BarValidator;

impl BarValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a bar for correctness
    pub fn validate(&self, bar: &PriceBar) -> Result<()> {
        self.validate_prices(bar)?;
        self.validate_ohlc_relationship(bar)?;
        Ok(())
    }

    /// Validate that all prices are positive and finite
    fn validate_prices(&self, bar: &PriceBar) -> Result<()> {
        let fields = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
            ("adj_close", bar.adj_close),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(bar, format!("Invalid {} price: {}", name, value)));
            }
        }
        Ok(())
    }

    /// Validate OHLC relationships (high >= low, etc.)
    fn validate_ohlc_relationship(&self, bar: &PriceBar) -> Result<()> {
        if bar.high < bar.low {
            return Err(invalid(
                bar,
                format!("High ({}) is less than low ({})", bar.high, bar.low),
            ));
        }

        if bar.high < bar.open {
            return Err(invalid(
                bar,
                format!("High ({}) is less than open ({})", bar.high, bar.open),
            ));
        }
        if bar.high < bar.close {
            return Err(invalid(
                bar,
                format!("High ({}) is less than close ({})", bar.high, bar.close),
            ));
        }

        if bar.low > bar.open {
            return Err(invalid(
                bar,
                format!("Low ({}) is greater than open ({})", bar.low, bar.open),
            ));
        }
        if bar.low > bar.close {
            return Err(invalid(
                bar,
                format!("Low ({}) is greater than close ({})", bar.low, bar.close),
            ));
        }

        Ok(())
    }
}

impl Default for BarValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid(bar: &PriceBar, reason: String) -> MarketDataError {
    MarketDataError::InvalidBar {
        date: bar.date,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_valid_bar() -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
            open: 100.0,
            high: 102.0,
            low: 99.0,
            close: 101.0,
            adj_close: 101.0,
            volume: 1_000_000,
        }
    }

    #[test]
    fn test_validate_valid_bar() {
        let validator = BarValidator::new();
        assert!(validator.validate(&make_valid_bar()).is_ok());
    }

    #[test]
    fn test_validate_negative_open() {
        let validator = BarValidator::new();
        let mut bar = make_valid_bar();
        bar.open = -100.0;

        let result = validator.validate(&bar);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Invalid open price"));
    }

    #[test]
    fn test_validate_nan_close() {
        let validator = BarValidator::new();
        let mut bar = make_valid_bar();
        bar.close = f64::NAN;

        assert!(validator.validate(&bar).is_err());
    }

    #[test]
    fn test_validate_high_below_low() {
        let validator = BarValidator::new();
        let mut bar = make_valid_bar();
        bar.high = 98.0;

        let err = validator.validate(&bar).unwrap_err().to_string();
        assert!(err.contains("less than low"), "{}", err);
        assert!(err.contains("2024-05-15"));
    }

    #[test]
    fn test_validate_open_outside_range() {
        let validator = BarValidator::new();
        let mut bar = make_valid_bar();
        bar.open = 103.0;

        let err = validator.validate(&bar).unwrap_err().to_string();
        assert!(err.contains("less than open"), "{}", err);
    }

    #[test]
    fn test_validate_close_below_low() {
        let validator = BarValidator::new();
        let mut bar = make_valid_bar();
        bar.close = 98.5;
        bar.adj_close = 98.5;

        let err = validator.validate(&bar).unwrap_err().to_string();
        assert!(err.contains("greater than close"), "{}", err);
    }

    #[test]
    fn test_zero_volume_allowed() {
        let validator = BarValidator::new();
        let mut bar = make_valid_bar();
        bar.volume = 0;

        assert!(validator.validate(&bar).is_ok());
    }
}
