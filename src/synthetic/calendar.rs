use chrono::{Datelike, Days, NaiveDate};

/// Business days (Mon-Fri) in `[today - days_back, today]`, ascending
///
/// No holiday calendar is applied. A window reaching past the earliest
/// representable date starts at that date.
pub fn trading_days(today: NaiveDate, days_back: u32) -> Vec<NaiveDate> {
    let start = today
        .checked_sub_days(Days::new(days_back as u64))
        .unwrap_or(NaiveDate::MIN);

    start
        .iter_days()
        .take_while(|date| *date <= today)
        .filter(|date| is_business_day(*date))
        .collect()
}

pub fn is_business_day(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}
