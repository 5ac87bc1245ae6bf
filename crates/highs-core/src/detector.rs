//! 52-week high detection over a daily series.
//!
//! Two rule families exist:
//!
//! - **Per-day** ([`evaluate`], [`evaluate_all`]): every bar in the target week is
//!   compared against the highest high of the bars in the 365 days before it.
//! - **Week aggregate** ([`evaluate_week`]): the week's single highest high is
//!   compared against the bars strictly before the week.
//!
//! A candidate counts as a high when `candidate >= baseline * (1 - tolerance)`.
//! A day (or week) with fewer than `min_history` bars in its baseline window is
//! not evaluable and yields no event.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::series::TimeSeries;
use crate::types::{DailyBar, Symbol};
use crate::window::WeekWindow;

/// Default tolerance band (0.1%).
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Default minimum number of bars in a baseline window.
pub const DEFAULT_MIN_HISTORY: usize = 200;

/// Default baseline length in calendar days.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 365;

/// Parameters of the high detector.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Fraction below the baseline that still counts as a high.
    pub tolerance: f64,
    /// Bars required in the baseline window before a day is evaluable.
    pub min_history: usize,
    /// Calendar days covered by the baseline window.
    pub lookback_days: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_history: DEFAULT_MIN_HISTORY,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Whether an event broke the prior high or only touched it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    /// The day's high strictly exceeded the baseline.
    New,
    /// The day's high reached the baseline within tolerance without exceeding it.
    Matched,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("New"),
            Self::Matched => f.write_str("Matched"),
        }
    }
}

/// A detected 52-week high.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighEvent {
    /// Symbol that made the high.
    pub symbol: Symbol,
    /// Day of the high.
    pub trade_date: NaiveDate,
    /// Opening price on that day.
    pub day_open: f64,
    /// High on that day.
    pub day_high: f64,
    /// Close on that day.
    pub day_close: f64,
    /// Volume on that day.
    pub day_volume: u64,
    /// The baseline the day was compared against.
    pub trailing_52w_high: f64,
    /// Date the baseline was first reached.
    pub trailing_52w_high_date: NaiveDate,
    /// Calendar days from the baseline date to the trade date.
    pub days_since_prior_high: i64,
    /// New or matched high.
    pub classification: Classification,
}

impl HighEvent {
    fn new(symbol: &Symbol, bar: &DailyBar, baseline: &DailyBar) -> Self {
        let classification = if bar.high > baseline.high {
            Classification::New
        } else {
            Classification::Matched
        };
        Self {
            symbol: symbol.clone(),
            trade_date: bar.date,
            day_open: bar.open,
            day_high: bar.high,
            day_close: bar.close,
            day_volume: bar.volume,
            trailing_52w_high: baseline.high,
            trailing_52w_high_date: baseline.date,
            days_since_prior_high: (bar.date - baseline.date).num_days(),
            classification,
        }
    }

    /// Percentage move from open to close on the day of the high.
    #[must_use]
    pub fn day_change_percent(&self) -> f64 {
        if self.day_open == 0.0 {
            return 0.0;
        }
        (self.day_close - self.day_open) / self.day_open * 100.0
    }

    /// Percentage by which the day's high exceeds the baseline.
    #[must_use]
    pub fn gain_percent(&self) -> f64 {
        if self.trailing_52w_high == 0.0 {
            return 0.0;
        }
        (self.day_high / self.trailing_52w_high - 1.0) * 100.0
    }
}

/// Returns true if `candidate` is at `trailing_high` within `tolerance`.
#[must_use]
pub fn is_high(candidate: f64, trailing_high: f64, tolerance: f64) -> bool {
    candidate >= trailing_high * (1.0 - tolerance)
}

/// Finds the first bar of the target week that makes a 52-week high.
#[must_use]
pub fn evaluate(series: &TimeSeries, window: &WeekWindow, config: &DetectorConfig) -> Option<HighEvent> {
    series
        .between(window.start..=window.end)
        .iter()
        .find_map(|bar| evaluate_day(series, bar, config))
}

/// Finds every bar of the target week that makes a 52-week high.
#[must_use]
pub fn evaluate_all(series: &TimeSeries, window: &WeekWindow, config: &DetectorConfig) -> Vec<HighEvent> {
    series
        .between(window.start..=window.end)
        .iter()
        .filter_map(|bar| evaluate_day(series, bar, config))
        .collect()
}

/// Compares the week's highest high against the history before the week.
#[must_use]
pub fn evaluate_week(series: &TimeSeries, window: &WeekWindow, config: &DetectorConfig) -> Option<HighEvent> {
    let week_peak = peak(series.between(window.start..=window.end))?;

    let from = baseline_start(window.start, config);
    let baseline = series.before(from, window.start);
    if baseline.len() < config.min_history {
        return None;
    }

    let prior = peak(baseline)?;
    is_high(week_peak.high, prior.high, config.tolerance)
        .then(|| HighEvent::new(series.symbol(), week_peak, prior))
}

/// Per-day check: `bar` against the bars in the lookback window before it.
fn evaluate_day(series: &TimeSeries, bar: &DailyBar, config: &DetectorConfig) -> Option<HighEvent> {
    let from = baseline_start(bar.date, config);
    if series.between(from..=bar.date).len() < config.min_history {
        return None;
    }

    let prior = peak(series.before(from, bar.date))?;
    is_high(bar.high, prior.high, config.tolerance).then(|| HighEvent::new(series.symbol(), bar, prior))
}

/// First date of the lookback window ending at `date`, clamped to the calendar.
fn baseline_start(date: NaiveDate, config: &DetectorConfig) -> NaiveDate {
    date.checked_sub_days(Days::new(config.lookback_days)).unwrap_or(NaiveDate::MIN)
}

/// Bar with the highest high; the earliest one wins ties.
fn peak(bars: &[DailyBar]) -> Option<&DailyBar> {
    bars.iter().fold(None, |best, bar| match best {
        Some(p) if p.high >= bar.high => Some(p),
        _ => Some(bar),
    })
}

/// Which detection rule a scan applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionStrategy {
    /// First qualifying day per symbol, reported chronologically.
    #[default]
    FirstMatch,
    /// Every qualifying day per symbol, reported chronologically.
    AllMatches,
    /// One event per symbol for the week's peak, ranked by gain.
    WeekAggregate,
}

impl DetectionStrategy {
    /// Runs this strategy over one series.
    #[must_use]
    pub fn detect(self, series: &TimeSeries, window: &WeekWindow, config: &DetectorConfig) -> Vec<HighEvent> {
        match self {
            Self::FirstMatch => evaluate(series, window, config).into_iter().collect(),
            Self::AllMatches => evaluate_all(series, window, config),
            Self::WeekAggregate => evaluate_week(series, window, config).into_iter().collect(),
        }
    }

    /// Sorts collected events into this strategy's presentation order.
    ///
    /// Per-day strategies order by date then symbol; the week aggregate ranks by
    /// gain over the baseline, highest first, then symbol.
    pub fn sort(self, events: &mut [HighEvent]) {
        match self {
            Self::FirstMatch | Self::AllMatches => events.sort_by(|a, b| {
                a.trade_date
                    .cmp(&b.trade_date)
                    .then_with(|| a.symbol.display_name().cmp(b.symbol.display_name()))
            }),
            Self::WeekAggregate => events.sort_by(|a, b| {
                match b.gain_percent().total_cmp(&a.gain_percent()) {
                    Ordering::Equal => a.symbol.display_name().cmp(b.symbol.display_name()),
                    other => other,
                }
            }),
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstMatch => f.write_str("first-match"),
            Self::AllMatches => f.write_str("all-matches"),
            Self::WeekAggregate => f.write_str("week-aggregate"),
        }
    }
}
