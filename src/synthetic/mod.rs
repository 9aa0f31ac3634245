pub mod calendar;
pub mod generator;
pub mod profiles;

pub use calendar::{is_business_day, trading_days};
pub use generator::SyntheticSeriesGenerator;
pub use profiles::{ticker_code_sum, KNOWN_PROFILES, TICKER_OPTIONS};
