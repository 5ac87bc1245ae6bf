//! Provider traits for fetching market data.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`PriceDataProvider`] - Daily OHLCV price data

use async_trait::async_trait;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::fmt::Debug;

use crate::{
    error::{DataError, Result},
    series::TimeSeries,
    types::Symbol,
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for daily OHLCV price data.
#[async_trait]
pub trait PriceDataProvider: DataProvider {
    /// Fetches daily bars for a single symbol, `start` and `end` inclusive.
    ///
    /// Returns a DataFrame with columns: symbol, date, open, high, low, close, volume.
    async fn fetch_daily(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> Result<DataFrame>;

    /// Fetches daily bars and validates them into a [`TimeSeries`].
    ///
    /// An empty frame is reported as [`DataError::DataNotAvailable`] for the
    /// requested range.
    async fn fetch_series(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries> {
        let frame = self.fetch_daily(symbol, start, end).await?;
        if frame.height() == 0 {
            return Err(DataError::DataNotAvailable {
                symbol: symbol.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        TimeSeries::from_frame(symbol.clone(), &frame)
    }
}
