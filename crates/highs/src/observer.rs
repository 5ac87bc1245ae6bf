//! Progress reporting for scans.
//!
//! Scans never log directly; they call a [`ScanObserver`]. The binary uses
//! [`TracingObserver`], tests use [`NoopObserver`] or their own recorder.

use highs_core::{DataError, Symbol, WeekWindow};
use tracing::{debug, error, info, warn};

use crate::scan::{ScanStats, SymbolOutcome};

/// Error messages are cut to this many characters in logs.
const LOG_MESSAGE_LIMIT: usize = 100;

/// Receives progress callbacks from [`scan`](crate::scan::scan) and
/// [`near_high`](crate::near_high::near_high).
///
/// Every method has an empty default so implementors pick what they need.
pub trait ScanObserver: Send + Sync {
    /// A weekly scan is about to start.
    fn scan_started(&self, _window: &WeekWindow, _symbols: usize) {}

    /// A batch of symbols is about to be fetched (1-based).
    fn batch_started(&self, _batch: usize, _batches: usize) {}

    /// One symbol of a weekly scan finished.
    fn symbol_finished(&self, _symbol: &Symbol, _outcome: &SymbolOutcome) {}

    /// The weekly scan finished.
    fn scan_finished(&self, _stats: &ScanStats) {}

    /// A near-high search is about to start.
    fn near_high_started(&self, _threshold_percent: f64, _symbols: usize) {}

    /// A symbol could not be evaluated by the near-high search.
    fn near_high_failed(&self, _symbol: &Symbol, _error: &DataError) {}

    /// The near-high search finished.
    fn near_high_finished(&self, _stats: &ScanStats) {}
}

/// Observer that ignores every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Observer that turns callbacks into `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TracingObserver {
    fn failure(symbol: &Symbol, error: &DataError) {
        match error {
            DataError::DataNotAvailable { .. } | DataError::SymbolNotFound(_) => {
                warn!(symbol = %symbol, "No data for {}", symbol);
            }
            other => {
                error!(
                    symbol = %symbol,
                    "Error processing {}: {}",
                    symbol,
                    other.truncated(LOG_MESSAGE_LIMIT)
                );
            }
        }
    }
}

impl ScanObserver for TracingObserver {
    fn scan_started(&self, window: &WeekWindow, symbols: usize) {
        info!("Scanning week: {}", window);
        info!("Checking {} stocks for 52-week highs...", symbols);
    }

    fn batch_started(&self, batch: usize, batches: usize) {
        info!("Processing batch {}/{}", batch, batches);
    }

    fn symbol_finished(&self, symbol: &Symbol, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Hit(events) => {
                for event in events {
                    info!(
                        symbol = %symbol,
                        classification = %event.classification,
                        "{} hit 52W high on {}",
                        symbol.display_name(),
                        event.trade_date
                    );
                }
            }
            SymbolOutcome::NoHit => debug!(symbol = %symbol, "No 52W high in window"),
            SymbolOutcome::Failed(e) => Self::failure(symbol, e),
        }
    }

    fn scan_finished(&self, stats: &ScanStats) {
        info!("Scan completed");
        info!("Successfully processed: {}", stats.success_count);
        info!("Errors: {}", stats.error_count);
        info!("Found {} stocks with 52-week highs", stats.hit_count);
    }

    fn near_high_started(&self, threshold_percent: f64, symbols: usize) {
        info!(
            "Finding stocks within {}% of 52-week high across {} symbols...",
            threshold_percent, symbols
        );
    }

    fn near_high_failed(&self, symbol: &Symbol, error: &DataError) {
        Self::failure(symbol, error);
    }

    fn near_high_finished(&self, stats: &ScanStats) {
        info!(
            "Near-high search completed: {} processed, {} errors, {} within threshold",
            stats.success_count, stats.error_count, stats.hit_count
        );
    }
}
