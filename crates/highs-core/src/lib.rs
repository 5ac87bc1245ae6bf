#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/highs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits, types and algorithms for the weekly 52-week high scanner.
//!
//! - [`PriceDataProvider`](provider::PriceDataProvider) - Daily OHLCV source
//! - [`TimeSeries`](series::TimeSeries) - Validated daily bars for one symbol
//! - [`compute_week`](window::compute_week) - Target week calculation
//! - [`DetectionStrategy`](detector::DetectionStrategy) - 52-week high rules

/// 52-week high detection.
pub mod detector;
/// Error types for data operations.
pub mod error;
/// Provider traits for fetching market data.
pub mod provider;
/// Validated daily time series.
pub mod series;
/// Core data types (Symbol, DailyBar).
pub mod types;
/// Target week calculation.
pub mod window;

// Re-export commonly used items at crate root
pub use detector::{
    Classification, DetectionStrategy, DetectorConfig, HighEvent, evaluate, evaluate_all, evaluate_week,
    is_high,
};
pub use error::{DataError, Result};
pub use provider::{DataProvider, PriceDataProvider};
pub use series::TimeSeries;
pub use types::{DailyBar, Symbol};
pub use window::{WeekVariant, WeekWindow, compute_week};
