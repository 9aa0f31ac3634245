use crate::models::TickerProfile;

/// Built-in baseline parameters, keyed by exact ticker symbol
pub const KNOWN_PROFILES: &[(&str, TickerProfile)] = &[
    ("AAPL", TickerProfile::new(180.0, 0.015, 0.0005)),
    ("MSFT", TickerProfile::new(350.0, 0.014, 0.0007)),
    ("GOOGL", TickerProfile::new(140.0, 0.018, 0.0004)),
    ("AMZN", TickerProfile::new(130.0, 0.022, 0.0006)),
    ("TSLA", TickerProfile::new(210.0, 0.040, 0.0005)),
    ("NVDA", TickerProfile::new(750.0, 0.035, 0.0010)),
    ("META", TickerProfile::new(450.0, 0.025, 0.0003)),
    ("NFLX", TickerProfile::new(550.0, 0.030, 0.0002)),
];

/// Display names for the selectable tickers
pub const TICKER_OPTIONS: &[(&str, &str)] = &[
    ("Apple (AAPL)", "AAPL"),
    ("Microsoft (MSFT)", "MSFT"),
    ("Google (GOOGL)", "GOOGL"),
    ("Amazon (AMZN)", "AMZN"),
    ("Tesla (TSLA)", "TSLA"),
    ("NVIDIA (NVDA)", "NVDA"),
    ("Meta/Facebook (META)", "META"),
    ("Netflix (NFLX)", "NFLX"),
];

/// Sum of the ticker's character codes
///
/// Seeds the random stream and scales the base volume.
pub fn ticker_code_sum(ticker: &str) -> u64 {
    ticker.chars().map(|c| c as u64).sum()
}

/// Check that a profile can drive the generator
pub fn check_profile(profile: &TickerProfile) -> std::result::Result<(), String> {
    if !profile.base_price.is_finite() || profile.base_price <= 0.0 {
        return Err(format!("base price must be positive, got {}", profile.base_price));
    }
    if !(profile.volatility > 0.0 && profile.volatility <= 1.0) {
        return Err(format!(
            "volatility must be in (0, 1], got {}",
            profile.volatility
        ));
    }
    if !profile.drift.is_finite() {
        return Err(format!("drift must be finite, got {}", profile.drift));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_sum() {
        // A=65 A=65 P=80 L=76
        assert_eq!(ticker_code_sum("AAPL"), 286);
        assert_eq!(ticker_code_sum(""), 0);
    }

    #[test]
    fn test_code_sum_is_case_sensitive() {
        assert_ne!(ticker_code_sum("aapl"), ticker_code_sum("AAPL"));
    }

    #[test]
    fn test_known_profiles_are_valid() {
        for (ticker, profile) in KNOWN_PROFILES {
            assert!(check_profile(profile).is_ok(), "{} profile invalid", ticker);
        }
    }

    #[test]
    fn test_every_option_has_a_profile() {
        for (_, ticker) in TICKER_OPTIONS {
            assert!(KNOWN_PROFILES.iter().any(|(t, _)| t == ticker));
        }
    }

    #[test]
    fn test_check_profile_rejects_bad_values() {
        assert!(check_profile(&TickerProfile::new(0.0, 0.02, 0.0)).is_err());
        assert!(check_profile(&TickerProfile::new(100.0, 0.0, 0.0)).is_err());
        assert!(check_profile(&TickerProfile::new(100.0, 1.5, 0.0)).is_err());
        assert!(check_profile(&TickerProfile::new(100.0, f64::NAN, 0.0)).is_err());
        assert!(check_profile(&TickerProfile::new(100.0, 0.02, f64::INFINITY)).is_err());
        assert!(check_profile(&TickerProfile::new(100.0, 1.0, -0.01)).is_ok());
    }
}
