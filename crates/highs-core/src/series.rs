//! Validated daily time series for one symbol.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use polars::prelude::*;

use crate::error::{DataError, Result};
use crate::types::{DailyBar, Symbol};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch, which polars dates count from.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Daily bars for one symbol, strictly increasing by date.
///
/// Construction validates every bar, so the detector can rely on ordering and
/// OHLC consistency without re-checking.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    symbol: Symbol,
    bars: Vec<DailyBar>,
}

impl TimeSeries {
    /// Builds a series from bars that are already in date order.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidBar`] if a bar breaks the OHLC invariants or
    /// if dates are not strictly increasing.
    pub fn new(symbol: Symbol, bars: Vec<DailyBar>) -> Result<Self> {
        for (idx, bar) in bars.iter().enumerate() {
            if let Some(reason) = bar.violation() {
                return Err(invalid(&symbol, bar.date, reason));
            }
            if idx > 0 && bars[idx - 1].date >= bar.date {
                return Err(invalid(&symbol, bar.date, "dates not strictly increasing"));
            }
        }
        Ok(Self { symbol, bars })
    }

    /// Converts a provider frame into a series.
    ///
    /// The frame must have `date`, `open`, `high`, `low`, `close` and `volume`
    /// columns. Rows with a missing price are dropped (Yahoo emits them for
    /// market holidays), a missing volume reads as zero, and when the same date
    /// appears on consecutive rows the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::Parse`] for a missing or mistyped column and
    /// [`DataError::DataNotAvailable`] if no usable rows remain.
    pub fn from_frame(symbol: Symbol, frame: &DataFrame) -> Result<Self> {
        let dates = cast_column(frame, "date", &DataType::Int32)?;
        let dates = dates.i32().map_err(parse_error)?;
        let opens = cast_column(frame, "open", &DataType::Float64)?;
        let opens = opens.f64().map_err(parse_error)?;
        let highs = cast_column(frame, "high", &DataType::Float64)?;
        let highs = highs.f64().map_err(parse_error)?;
        let lows = cast_column(frame, "low", &DataType::Float64)?;
        let lows = lows.f64().map_err(parse_error)?;
        let closes = cast_column(frame, "close", &DataType::Float64)?;
        let closes = closes.f64().map_err(parse_error)?;
        let volumes = cast_column(frame, "volume", &DataType::UInt64)?;
        let volumes = volumes.u64().map_err(parse_error)?;

        let mut bars: Vec<DailyBar> = Vec::with_capacity(frame.height());
        for i in 0..frame.height() {
            let Some(days) = dates.get(i) else {
                return Err(DataError::Parse(format!("{symbol}: missing date at row {i}")));
            };
            let date = NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
                .ok_or_else(|| DataError::Parse(format!("{symbol}: date out of range at row {i}")))?;

            let (Some(open), Some(high), Some(low), Some(close)) =
                (opens.get(i), highs.get(i), lows.get(i), closes.get(i))
            else {
                continue;
            };
            let bar = DailyBar::new(date, open, high, low, close, volumes.get(i).unwrap_or(0));

            match bars.last_mut() {
                Some(last) if last.date == date => *last = bar,
                _ => bars.push(bar),
            }
        }

        if bars.is_empty() {
            return Err(DataError::DataNotAvailable {
                symbol: symbol.to_string(),
                start: "N/A".to_string(),
                end: "N/A".to_string(),
            });
        }

        Self::new(symbol, bars)
    }

    /// Returns the symbol this series belongs to.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns all bars in date order.
    #[must_use]
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if there are no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns the most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<&DailyBar> {
        self.bars.last()
    }

    /// Returns the bars dated within `range`, inclusive at both ends.
    #[must_use]
    pub fn between(&self, range: RangeInclusive<NaiveDate>) -> &[DailyBar] {
        let lo = self.bars.partition_point(|b| b.date < *range.start());
        let hi = self.bars.partition_point(|b| b.date <= *range.end());
        &self.bars[lo..hi.max(lo)]
    }

    /// Returns the bars dated on or after `from` and strictly before `until`.
    #[must_use]
    pub fn before(&self, from: NaiveDate, until: NaiveDate) -> &[DailyBar] {
        let lo = self.bars.partition_point(|b| b.date < from);
        let hi = self.bars.partition_point(|b| b.date < until);
        &self.bars[lo..hi.max(lo)]
    }
}

fn cast_column(frame: &DataFrame, name: &str, dtype: &DataType) -> Result<Column> {
    frame
        .column(name)
        .map_err(parse_error)?
        .cast(dtype)
        .map_err(parse_error)
}

fn parse_error(e: PolarsError) -> DataError {
    DataError::Parse(e.to_string())
}

fn invalid(symbol: &Symbol, date: NaiveDate, reason: &str) -> DataError {
    DataError::InvalidBar {
        symbol: symbol.to_string(),
        date: date.to_string(),
        reason: reason.to_string(),
    }
}
