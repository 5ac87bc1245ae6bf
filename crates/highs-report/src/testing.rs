//! Shared fixtures.

use chrono::NaiveDate;
use highs::{Classification, HighEvent, Symbol};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One `New` event for TCS and one `Matched` event for ABB.
pub(crate) fn sample_events() -> Vec<HighEvent> {
    vec![
        HighEvent {
            symbol: Symbol::new("TCS.NS"),
            trade_date: date(2025, 9, 24),
            day_open: 100.0,
            day_high: 105.004,
            day_close: 102.0,
            day_volume: 1_250_000,
            trailing_52w_high: 100.0,
            trailing_52w_high_date: date(2024, 11, 26),
            days_since_prior_high: 302,
            classification: Classification::New,
        },
        HighEvent {
            symbol: Symbol::new("ABB.NS"),
            trade_date: date(2025, 9, 25),
            day_open: 99.0,
            day_high: 99.95,
            day_close: 99.5,
            day_volume: 800,
            trailing_52w_high: 100.0,
            trailing_52w_high_date: date(2025, 3, 3),
            days_since_prior_high: 206,
            classification: Classification::Matched,
        },
    ]
}
