//! Weekly scan over a universe.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use highs_core::{DataError, DetectionStrategy, HighEvent, Result, Symbol, WeekWindow};

use crate::config::ScanConfig;
use crate::observer::ScanObserver;
use crate::registry::DataProviderRegistry;
use crate::universe::Universe;

/// What happened to one symbol during a scan.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// The detector reported one or more highs.
    Hit(Vec<HighEvent>),
    /// Data was fine but nothing qualified (or nothing was evaluable).
    NoHit,
    /// The symbol could not be fetched or validated.
    Failed(DataError),
}

impl SymbolOutcome {
    /// Returns true unless the symbol failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Counters for a finished scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Symbols fetched and evaluated, with or without a hit.
    pub success_count: usize,
    /// Symbols that failed to fetch or validate.
    pub error_count: usize,
    /// Symbols with at least one reported event.
    pub hit_count: usize,
}

/// Result of a weekly scan.
#[derive(Debug)]
pub struct ScanReport {
    /// The scanned week.
    pub window: WeekWindow,
    /// Strategy that produced `results`.
    pub strategy: DetectionStrategy,
    /// Events in the strategy's presentation order.
    pub results: Vec<HighEvent>,
    /// Symbols that failed, in universe order.
    pub failures: Vec<(Symbol, DataError)>,
    /// Counters.
    pub stats: ScanStats,
}

/// Scans `universe` for 52-week highs in the configured week relative to `today`.
///
/// Symbols are fetched one at a time in universe order and reported in batches
/// of `config.batch_size`. A failing symbol is recorded and never stops the scan.
///
/// # Errors
///
/// Returns [`DataError::InvalidParameter`] if `config` does not validate. Per-symbol
/// failures are reported in [`ScanReport::failures`], not here.
pub async fn scan(
    universe: &Universe,
    registry: &DataProviderRegistry,
    config: &ScanConfig,
    today: NaiveDate,
    observer: &dyn ScanObserver,
) -> Result<ScanReport> {
    config.validate()?;

    let window = config.window(today)?;
    let history_start = window.history_start(config.history_buffer_days).ok_or_else(|| {
        DataError::InvalidParameter(format!(
            "{} days of history before {} is outside the calendar",
            config.history_buffer_days, window.start
        ))
    })?;
    observer.scan_started(&window, universe.len());

    let symbols = universe.symbols();
    let batches = symbols.len().div_ceil(config.batch_size);
    let mut stats = ScanStats::default();
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for (idx, batch) in symbols.chunks(config.batch_size).enumerate() {
        observer.batch_started(idx + 1, batches);

        let outcomes: Vec<SymbolOutcome> = stream::iter(batch)
            .then(|symbol| async move {
                let outcome = scan_symbol(registry, symbol, &window, history_start, config).await;
                observer.symbol_finished(symbol, &outcome);
                outcome
            })
            .collect()
            .await;

        for (symbol, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                SymbolOutcome::Hit(events) => {
                    stats.success_count += 1;
                    stats.hit_count += 1;
                    results.extend(events);
                }
                SymbolOutcome::NoHit => stats.success_count += 1,
                SymbolOutcome::Failed(e) => {
                    stats.error_count += 1;
                    failures.push((symbol.clone(), e));
                }
            }
        }
    }

    config.strategy.sort(&mut results);
    observer.scan_finished(&stats);

    Ok(ScanReport {
        window,
        strategy: config.strategy,
        results,
        failures,
        stats,
    })
}

async fn scan_symbol(
    registry: &DataProviderRegistry,
    symbol: &Symbol,
    window: &WeekWindow,
    history_start: NaiveDate,
    config: &ScanConfig,
) -> SymbolOutcome {
    let series = match registry.fetch_series(symbol, history_start, window.end).await {
        Ok(series) => series,
        Err(e) => return SymbolOutcome::Failed(e),
    };

    let events = config.strategy.detect(&series, window, &config.detector);
    if events.is_empty() {
        SymbolOutcome::NoHit
    } else {
        SymbolOutcome::Hit(events)
    }
}
