//! Core data types for daily price data.
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`DailyBar`] - One trading day of OHLCV data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange suffixes Yahoo appends to Indian listings.
const EXCHANGE_SUFFIXES: &[&str] = &[".NS", ".BO"];

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the symbol with any exchange suffix removed, for display.
    ///
    /// `RELIANCE.NS` becomes `RELIANCE`; symbols without a known suffix are
    /// returned unchanged.
    #[must_use]
    pub fn display_name(&self) -> &str {
        EXCHANGE_SUFFIXES
            .iter()
            .find_map(|suffix| self.0.strip_suffix(suffix))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One trading day of OHLCV data, dated in the exchange's local calendar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Exchange-local trading date.
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the day.
    pub high: f64,
    /// Lowest price of the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

impl DailyBar {
    /// Creates a new daily bar.
    #[must_use]
    pub const fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Percentage move from open to close.
    ///
    /// Returns `0.0` when the open is zero.
    #[must_use]
    pub fn change_percent(&self) -> f64 {
        if self.open == 0.0 {
            return 0.0;
        }
        (self.close - self.open) / self.open * 100.0
    }

    /// Checks the price invariants, returning a description of the first violation.
    pub(crate) fn violation(&self) -> Option<&'static str> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Some("non-finite price");
        }
        if prices.iter().any(|p| *p < 0.0) {
            return Some("negative price");
        }
        if self.low > self.high {
            return Some("low above high");
        }
        if self.open < self.low || self.open > self.high {
            return Some("open outside low..high");
        }
        if self.close < self.low || self.close > self.high {
            return Some("close outside low..high");
        }
        None
    }
}
