#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/highs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Core types, traits and the detector
pub use highs_core::*;

// Providers
#[cfg(feature = "yahoo")]
pub use highs_yahoo::YahooProvider;

/// Scan configuration.
pub mod config;
/// Distance-from-high finder.
pub mod near_high;
/// Progress callbacks.
pub mod observer;
mod registry;
/// Weekly scan loop.
pub mod scan;
/// Symbol universes.
pub mod universe;

#[cfg(test)]
mod testing;

pub use config::{NearHighConfig, ScanConfig};
pub use near_high::{NearHighRecord, NearHighReport, near_high};
pub use observer::{NoopObserver, ScanObserver, TracingObserver};
pub use registry::DataProviderRegistry;
pub use scan::{ScanReport, ScanStats, SymbolOutcome, scan};
pub use universe::{NIFTY_100, NSE_SUFFIX, Universe};
