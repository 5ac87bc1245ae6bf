//! Scan configuration.

use std::time::Duration;

use chrono::NaiveDate;
use highs_core::{DataError, DetectionStrategy, DetectorConfig, Result, WeekVariant, WeekWindow, compute_week};
use serde::{Deserialize, Serialize};

/// Calendar days fetched before the window start.
pub const DEFAULT_HISTORY_BUFFER_DAYS: u64 = 400;

/// Per-symbol fetch deadline in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Symbols per progress batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default near-high threshold in percent.
pub const DEFAULT_NEAR_HIGH_THRESHOLD: f64 = 5.0;

/// Largest accepted `weeks_back` (about a century).
pub const MAX_WEEKS_BACK: u32 = 5_200;

/// Largest accepted history or lookback span in calendar days (about a century).
pub const MAX_HISTORY_DAYS: u64 = 36_525;

/// Everything a weekly scan needs besides the universe and the data source.
///
/// Every field has a default, so a TOML file only lists what it changes:
///
/// ```toml
/// weeks_back = 1
/// strategy = "week-aggregate"
///
/// [detector]
/// tolerance = 0.002
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Trading (Mon-Fri) or calendar (Mon-Sun) week.
    pub week: WeekVariant,
    /// How many weeks before the current one to scan.
    pub weeks_back: u32,
    /// Detection rule.
    pub strategy: DetectionStrategy,
    /// Detector parameters.
    pub detector: DetectorConfig,
    /// Calendar days of history fetched before the window start.
    pub history_buffer_days: u64,
    /// Per-symbol fetch deadline in seconds.
    pub fetch_timeout_secs: u64,
    /// Symbols per progress batch.
    pub batch_size: usize,
    /// Near-high finder settings.
    pub near_high: NearHighConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            week: WeekVariant::default(),
            weeks_back: 0,
            strategy: DetectionStrategy::default(),
            detector: DetectorConfig::default(),
            history_buffer_days: DEFAULT_HISTORY_BUFFER_DAYS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            batch_size: DEFAULT_BATCH_SIZE,
            near_high: NearHighConfig::default(),
        }
    }
}

impl ScanConfig {
    /// The week this configuration scans, relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidParameter`] if the week falls outside the calendar.
    pub fn window(&self, today: NaiveDate) -> Result<WeekWindow> {
        compute_week(today, self.weeks_back, self.week).ok_or_else(|| {
            DataError::InvalidParameter(format!(
                "{} weeks back from {today} is outside the calendar",
                self.weeks_back
            ))
        })
    }

    /// Per-symbol fetch deadline.
    #[must_use]
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Rejects values the scan cannot run with.
    pub fn validate(&self) -> Result<()> {
        let tolerance = self.detector.tolerance;
        if !(0.0..1.0).contains(&tolerance) {
            return Err(DataError::InvalidParameter(format!(
                "tolerance must be in [0, 1), got {tolerance}"
            )));
        }
        if self.weeks_back > MAX_WEEKS_BACK {
            return Err(DataError::InvalidParameter(format!(
                "weeks_back must be at most {MAX_WEEKS_BACK}, got {}",
                self.weeks_back
            )));
        }
        if self.detector.lookback_days == 0 {
            return Err(DataError::InvalidParameter("lookback_days must be positive".to_string()));
        }
        if self.history_buffer_days > MAX_HISTORY_DAYS {
            return Err(DataError::InvalidParameter(format!(
                "history_buffer_days must be at most {MAX_HISTORY_DAYS}, got {}",
                self.history_buffer_days
            )));
        }
        if self.history_buffer_days < self.detector.lookback_days {
            return Err(DataError::InvalidParameter(format!(
                "history_buffer_days ({}) must cover lookback_days ({})",
                self.history_buffer_days, self.detector.lookback_days
            )));
        }
        if self.batch_size == 0 {
            return Err(DataError::InvalidParameter("batch_size must be at least 1".to_string()));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(DataError::InvalidParameter("fetch_timeout_secs must be positive".to_string()));
        }
        self.near_high.validate()
    }
}

/// Settings for the distance-from-high finder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearHighConfig {
    /// Maximum distance below the 52-week high, in percent.
    pub threshold_percent: f64,
    /// Calendar days of history the high and low are taken over.
    pub lookback_days: u64,
}

impl Default for NearHighConfig {
    fn default() -> Self {
        Self {
            threshold_percent: DEFAULT_NEAR_HIGH_THRESHOLD,
            lookback_days: highs_core::detector::DEFAULT_LOOKBACK_DAYS,
        }
    }
}

impl NearHighConfig {
    fn validate(&self) -> Result<()> {
        if !self.threshold_percent.is_finite() || self.threshold_percent < 0.0 {
            return Err(DataError::InvalidParameter(format!(
                "near-high threshold must be a non-negative percentage, got {}",
                self.threshold_percent
            )));
        }
        if !(1..=MAX_HISTORY_DAYS).contains(&self.lookback_days) {
            return Err(DataError::InvalidParameter(format!(
                "near-high lookback_days must be in 1..={MAX_HISTORY_DAYS}, got {}",
                self.lookback_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.detector.tolerance, 0.001);
        assert_eq!(config.detector.min_history, 200);
        assert_eq!(config.history_buffer_days, 400);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.near_high.threshold_percent, 5.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_uses_weeks_back_and_variant() {
        let config = ScanConfig {
            weeks_back: 1,
            week: WeekVariant::Calendar,
            ..ScanConfig::default()
        };
        let window = config.window(NaiveDate::from_ymd_opt(2025, 9, 26).unwrap()).unwrap();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2025, 9, 21).unwrap());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ScanConfig::default();
        config.detector.tolerance = 1.5;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.history_buffer_days = 100;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.near_high.threshold_percent = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_spans_are_rejected() {
        let config = ScanConfig {
            weeks_back: u32::MAX,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(DataError::InvalidParameter(_))));
        let today = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
        assert!(matches!(config.window(today), Err(DataError::InvalidParameter(_))));

        let config = ScanConfig {
            weeks_back: MAX_WEEKS_BACK,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.window(today).is_ok());

        let mut config = ScanConfig::default();
        config.history_buffer_days = u64::MAX;
        config.detector.lookback_days = u64::MAX;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.near_high.lookback_days = u64::MAX;
        assert!(config.validate().is_err());
    }
}
