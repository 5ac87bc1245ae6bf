//! Stocks trading close to their 52-week high.

use chrono::{Days, NaiveDate};
use futures::stream::{self, StreamExt};
use highs_core::{DataError, Result, Symbol, TimeSeries};
use serde::Serialize;

use crate::config::ScanConfig;
use crate::observer::ScanObserver;
use crate::registry::DataProviderRegistry;
use crate::scan::ScanStats;
use crate::universe::Universe;

/// How far one symbol trades from its 52-week range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NearHighRecord {
    /// The symbol.
    pub symbol: Symbol,
    /// Last close in the series.
    pub current_price: f64,
    /// Highest high in the series.
    pub week_52_high: f64,
    /// Lowest low in the series.
    pub week_52_low: f64,
    /// Distance below the high, in percent of the high.
    pub distance_percent: f64,
    /// Gain from the low to the current price, in percent.
    pub performance_52w_percent: f64,
}

impl NearHighRecord {
    /// Summarises a series. Returns `None` for an empty series or a zero high.
    #[must_use]
    pub fn from_series(series: &TimeSeries) -> Option<Self> {
        let current_price = series.last()?.close;
        let week_52_high = series.bars().iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let week_52_low = series.bars().iter().map(|b| b.low).fold(f64::MAX, f64::min);
        if week_52_high <= 0.0 {
            return None;
        }

        let performance_52w_percent = if week_52_low > 0.0 {
            (current_price - week_52_low) * 100.0 / week_52_low
        } else {
            0.0
        };

        Some(Self {
            symbol: series.symbol().clone(),
            current_price,
            week_52_high,
            week_52_low,
            distance_percent: distance_percent(week_52_high, current_price),
            performance_52w_percent,
        })
    }
}

/// Percent that `price` sits below `high`.
#[must_use]
pub fn distance_percent(high: f64, price: f64) -> f64 {
    (high - price) * 100.0 / high
}

/// Result of a near-high search.
#[derive(Debug)]
pub struct NearHighReport {
    /// Threshold the records were filtered with, in percent.
    pub threshold_percent: f64,
    /// Records within the threshold, best 52-week performance first.
    pub records: Vec<NearHighRecord>,
    /// Symbols that failed, in universe order.
    pub failures: Vec<(Symbol, DataError)>,
    /// Counters; `hit_count` is the number of records.
    pub stats: ScanStats,
}

/// Finds symbols whose last close is within `threshold_percent` of their 52-week high.
///
/// History covers `[today - lookback_days, today]` from `config.near_high`.
/// Symbols are fetched one at a time in universe order.
///
/// # Errors
///
/// Returns [`DataError::InvalidParameter`] for a negative or non-finite threshold
/// or an invalid `config`.
pub async fn near_high(
    universe: &Universe,
    registry: &DataProviderRegistry,
    today: NaiveDate,
    threshold_percent: f64,
    config: &ScanConfig,
    observer: &dyn ScanObserver,
) -> Result<NearHighReport> {
    if !threshold_percent.is_finite() || threshold_percent < 0.0 {
        return Err(DataError::InvalidParameter(format!(
            "near-high threshold must be a non-negative percentage, got {threshold_percent}"
        )));
    }
    config.validate()?;
    observer.near_high_started(threshold_percent, universe.len());

    let lookback = config.near_high.lookback_days;
    let start = today.checked_sub_days(Days::new(lookback)).ok_or_else(|| {
        DataError::InvalidParameter(format!("{lookback} days before {today} is outside the calendar"))
    })?;
    let outcomes: Vec<Result<Option<NearHighRecord>>> = stream::iter(universe.symbols())
        .then(|symbol| async move {
            let outcome = registry
                .fetch_series(symbol, start, today)
                .await
                .map(|series| NearHighRecord::from_series(&series));
            if let Err(e) = &outcome {
                observer.near_high_failed(symbol, e);
            }
            outcome
        })
        .collect()
        .await;

    let mut stats = ScanStats::default();
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (symbol, outcome) in universe.symbols().iter().zip(outcomes) {
        match outcome {
            Ok(record) => {
                stats.success_count += 1;
                if let Some(record) = record.filter(|r| r.distance_percent <= threshold_percent) {
                    records.push(record);
                }
            }
            Err(e) => {
                stats.error_count += 1;
                failures.push((symbol.clone(), e));
            }
        }
    }

    records.sort_by(|a, b| {
        b.performance_52w_percent
            .total_cmp(&a.performance_52w_percent)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    stats.hit_count = records.len();
    observer.near_high_finished(&stats);

    Ok(NearHighReport {
        threshold_percent,
        records,
        failures,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use crate::testing::{MockProvider, RecordingObserver, TimedProvider, Timeline, TimelineObserver, flat_series};
    use highs_core::DailyBar;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 22).unwrap()
    }

    /// Flat at a high of 100, then a last close of `close` on `today`.
    fn closing_at(symbol: &str, close: f64) -> TimeSeries {
        let flat = flat_series(symbol, 300, 100.0);
        let mut bars = flat.bars().to_vec();
        bars.push(DailyBar::new(today(), close, close + 1.0, close - 1.0, close, 5_000));
        TimeSeries::new(Symbol::new(symbol), bars).unwrap()
    }

    fn registry() -> DataProviderRegistry {
        let mut registry = DataProviderRegistry::new();
        registry.register_price(Arc::new(
            MockProvider::default()
                .with_series(closing_at("HAL.NS", 95.0))
                .with_series(closing_at("BEL.NS", 99.0))
                .with_series(closing_at("PNB.NS", 80.0))
                .with_failure("IOC.NS", "HTTP 500"),
        ));
        registry
    }

    fn universe() -> Universe {
        Universe::from_symbols("test", ["HAL.NS", "BEL.NS", "PNB.NS", "IOC.NS", "GONE.NS"])
    }

    #[test]
    fn test_distance_percent() {
        assert_eq!(distance_percent(100.0, 95.0), 5.0);
        assert_eq!(distance_percent(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_record_from_series() {
        let record = NearHighRecord::from_series(&closing_at("HAL.NS", 95.0)).unwrap();
        assert_eq!(record.current_price, 95.0);
        assert_eq!(record.week_52_high, 100.0);
        assert_eq!(record.week_52_low, 94.0);
        assert_eq!(record.distance_percent, 5.0);
        assert!((record.performance_52w_percent - 100.0 / 94.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let config = ScanConfig::default();
        let report = near_high(&universe(), &registry(), today(), 5.0, &config, &NoopObserver)
            .await
            .unwrap();
        let symbols: Vec<&str> = report.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["HAL.NS", "BEL.NS"]);

        let report = near_high(&universe(), &registry(), today(), 4.9, &config, &NoopObserver)
            .await
            .unwrap();
        let symbols: Vec<&str> = report.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["BEL.NS"]);
    }

    #[tokio::test]
    async fn test_sorted_by_performance_and_failures_counted() {
        let observer = RecordingObserver::default();
        let report = near_high(&universe(), &registry(), today(), 25.0, &ScanConfig::default(), &observer)
            .await
            .unwrap();

        // BEL: (99 - 98) / 98, HAL: (95 - 94) / 94, PNB: (80 - 79) / 79
        let symbols: Vec<&str> = report.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["PNB.NS", "HAL.NS", "BEL.NS"]);
        assert_eq!(report.stats.success_count, 3);
        assert_eq!(report.stats.error_count, 2);
        assert_eq!(report.stats.hit_count, 3);
        assert_eq!(observer.failed(), ["IOC.NS", "GONE.NS"]);
    }

    #[tokio::test]
    async fn test_negative_threshold_rejected() {
        let err = near_high(&universe(), &registry(), today(), -1.0, &ScanConfig::default(), &NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_failures_reported_as_they_happen() {
        let timeline = Timeline::default();
        let mut registry = DataProviderRegistry::new();
        registry.register_price(Arc::new(TimedProvider {
            inner: MockProvider::default()
                .with_series(closing_at("HAL.NS", 95.0))
                .with_failure("IOC.NS", "HTTP 500"),
            timeline: timeline.clone(),
        }));
        let universe = Universe::from_symbols("test", ["IOC.NS", "HAL.NS"]);

        near_high(
            &universe,
            &registry,
            today(),
            5.0,
            &ScanConfig::default(),
            &TimelineObserver(timeline.clone()),
        )
        .await
        .unwrap();

        assert_eq!(timeline.entries(), ["fetch IOC.NS", "failed IOC.NS", "fetch HAL.NS"]);
    }
}
