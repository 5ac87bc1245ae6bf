//! In-memory providers and fixtures shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};
use polars::prelude::{Column, DataFrame, DataType};

use highs_core::{DailyBar, DataError, DataProvider, PriceDataProvider, Result, Symbol, TimeSeries, WeekWindow};

use crate::observer::ScanObserver;
use crate::scan::{ScanStats, SymbolOutcome};

/// Last day of every [`flat_series`], the Sunday before the 2025-09-22 week.
pub(crate) fn series_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 21).unwrap()
}

/// A bar whose low, open and close sit just under `high`.
pub(crate) fn bar(date: NaiveDate, high: f64) -> DailyBar {
    DailyBar::new(date, high * 0.99, high, high * 0.98, high * 0.99, 1_000)
}

/// `days` consecutive daily bars ending on [`series_end`], all with the same high.
pub(crate) fn flat_series(symbol: &str, days: u64, high: f64) -> TimeSeries {
    let first = series_end() - Days::new(days - 1);
    let bars = (0..days).map(|i| bar(first + Days::new(i), high)).collect();
    TimeSeries::new(Symbol::new(symbol), bars).unwrap()
}

/// Appends bars on the given days of September 2025 to `series`.
pub(crate) fn with_week(series: TimeSeries, days: &[(u32, f64)]) -> TimeSeries {
    let symbol = series.symbol().clone();
    let mut bars = series.bars().to_vec();
    bars.extend(
        days.iter()
            .map(|&(day, high)| bar(NaiveDate::from_ymd_opt(2025, 9, day).unwrap(), high)),
    );
    TimeSeries::new(symbol, bars).unwrap()
}

/// The provider frame layout for `bars`.
pub(crate) fn bars_frame(symbol: &Symbol, bars: &[DailyBar]) -> DataFrame {
    let days: Vec<i32> = bars.iter().map(|b| b.date.num_days_from_ce() - 719_163).collect();
    DataFrame::new(vec![
        Column::new("symbol".into(), vec![symbol.as_str(); bars.len()]),
        Column::new("date".into(), days).cast(&DataType::Date).unwrap(),
        Column::new("open".into(), bars.iter().map(|b| b.open).collect::<Vec<_>>()),
        Column::new("high".into(), bars.iter().map(|b| b.high).collect::<Vec<_>>()),
        Column::new("low".into(), bars.iter().map(|b| b.low).collect::<Vec<_>>()),
        Column::new("close".into(), bars.iter().map(|b| b.close).collect::<Vec<_>>()),
        Column::new("volume".into(), bars.iter().map(|b| b.volume).collect::<Vec<_>>()),
    ])
    .unwrap()
}

/// Serves canned series; unknown symbols get an empty frame.
#[derive(Debug, Default)]
pub(crate) struct MockProvider {
    series: HashMap<Symbol, TimeSeries>,
    failures: HashMap<Symbol, String>,
}

impl MockProvider {
    pub(crate) fn with_series(mut self, series: TimeSeries) -> Self {
        self.series.insert(series.symbol().clone(), series);
        self
    }

    pub(crate) fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.failures.insert(Symbol::new(symbol), message.to_string());
        self
    }
}

impl DataProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    fn description(&self) -> &str {
        "In-memory test provider"
    }
}

#[async_trait]
impl PriceDataProvider for MockProvider {
    async fn fetch_daily(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> Result<DataFrame> {
        if let Some(message) = self.failures.get(symbol) {
            return Err(DataError::Network(message.clone()));
        }
        match self.series.get(symbol) {
            Some(series) => Ok(bars_frame(symbol, series.between(start..=end))),
            None => Ok(DataFrame::empty()),
        }
    }
}

/// Never answers within any sensible deadline.
#[derive(Debug)]
pub(crate) struct SlowProvider(pub(crate) Duration);

impl DataProvider for SlowProvider {
    fn name(&self) -> &str {
        "Slow"
    }

    fn description(&self) -> &str {
        "Sleeps before answering"
    }
}

#[async_trait]
impl PriceDataProvider for SlowProvider {
    async fn fetch_daily(&self, _symbol: &Symbol, _start: NaiveDate, _end: NaiveDate) -> Result<DataFrame> {
        tokio::time::sleep(self.0).await;
        Ok(DataFrame::empty())
    }
}

/// Records the callbacks a scan makes.
#[derive(Debug, Default)]
pub(crate) struct RecordingObserver {
    batches: Mutex<Vec<(usize, usize)>>,
    finished: Mutex<Vec<String>>,
    failed: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub(crate) fn batches(&self) -> Vec<(usize, usize)> {
        self.batches.lock().unwrap().clone()
    }

    pub(crate) fn finished(&self) -> Vec<String> {
        self.finished.lock().unwrap().clone()
    }

    pub(crate) fn failed(&self) -> Vec<String> {
        self.failed.lock().unwrap().clone()
    }
}

impl ScanObserver for RecordingObserver {
    fn scan_started(&self, _window: &WeekWindow, _symbols: usize) {}

    fn batch_started(&self, batch: usize, batches: usize) {
        self.batches.lock().unwrap().push((batch, batches));
    }

    fn symbol_finished(&self, symbol: &Symbol, _outcome: &SymbolOutcome) {
        self.finished.lock().unwrap().push(symbol.to_string());
    }

    fn scan_finished(&self, _stats: &ScanStats) {}

    fn near_high_failed(&self, symbol: &Symbol, _error: &DataError) {
        self.failed.lock().unwrap().push(symbol.to_string());
    }
}

/// Ordered log shared by a provider and an observer.
#[derive(Clone, Debug, Default)]
pub(crate) struct Timeline(Arc<Mutex<Vec<String>>>);

impl Timeline {
    fn push(&self, entry: String) {
        self.0.lock().unwrap().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Notes each fetch on a [`Timeline`] before delegating.
#[derive(Debug)]
pub(crate) struct TimedProvider {
    pub(crate) inner: MockProvider,
    pub(crate) timeline: Timeline,
}

impl DataProvider for TimedProvider {
    fn name(&self) -> &str {
        "Timed"
    }

    fn description(&self) -> &str {
        "Logs fetches before delegating"
    }
}

#[async_trait]
impl PriceDataProvider for TimedProvider {
    async fn fetch_daily(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> Result<DataFrame> {
        self.timeline.push(format!("fetch {symbol}"));
        self.inner.fetch_daily(symbol, start, end).await
    }
}

/// Notes finished and failed symbols on a [`Timeline`].
#[derive(Debug)]
pub(crate) struct TimelineObserver(pub(crate) Timeline);

impl ScanObserver for TimelineObserver {
    fn symbol_finished(&self, symbol: &Symbol, _outcome: &SymbolOutcome) {
        self.0.push(format!("done {symbol}"));
    }

    fn near_high_failed(&self, symbol: &Symbol, _error: &DataError) {
        self.0.push(format!("failed {symbol}"));
    }
}
