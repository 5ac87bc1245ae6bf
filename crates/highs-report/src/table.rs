//! Column-typed result tables.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use highs::{Classification, HighEvent, NearHighRecord};
use polars::prelude::{Column, DataFrame, DataType};

use crate::error::{ReportError, Result};

/// Days between 0001-01-01 and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Values of one table column.
#[derive(Clone, Debug, PartialEq)]
pub enum Values {
    /// Free text.
    Text(Vec<String>),
    /// Whole numbers.
    Int(Vec<i64>),
    /// Prices and percentages, already rounded to two decimals.
    Number(Vec<f64>),
    /// Calendar dates.
    Date(Vec<NaiveDate>),
}

impl Values {
    fn len(&self) -> usize {
        match self {
            Self::Text(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Number(v) => v.len(),
            Self::Date(v) => v.len(),
        }
    }

    fn format(&self, row: usize) -> String {
        match self {
            Self::Text(v) => v[row].clone(),
            Self::Int(v) => v[row].to_string(),
            Self::Number(v) => format!("{:.2}", v[row]),
            Self::Date(v) => v[row].to_string(),
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct TableColumn {
    /// Header text.
    pub name: &'static str,
    /// Cell values.
    pub values: Values,
}

impl TableColumn {
    fn new(name: &'static str, values: Values) -> Self {
        Self { name, values }
    }
}

/// A table of scan results with the same columns in every output format.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportTable {
    columns: Vec<TableColumn>,
}

/// Rounds to two decimals.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn numbers<T>(rows: &[T], f: impl Fn(&T) -> f64) -> Values {
    Values::Number(rows.iter().map(|r| round2(f(r))).collect())
}

impl ReportTable {
    /// Table of 52-week high events, one row per event in the given order.
    #[must_use]
    pub fn highs(events: &[HighEvent]) -> Self {
        let columns = vec![
            TableColumn::new(
                "Stock",
                Values::Text(events.iter().map(|e| e.symbol.display_name().to_string()).collect()),
            ),
            TableColumn::new("Date", Values::Date(events.iter().map(|e| e.trade_date).collect())),
            TableColumn::new("High", numbers(events, |e| e.day_high)),
            TableColumn::new("Close", numbers(events, |e| e.day_close)),
            TableColumn::new(
                "Volume",
                Values::Int(
                    events
                        .iter()
                        .map(|e| i64::try_from(e.day_volume).unwrap_or(i64::MAX))
                        .collect(),
                ),
            ),
            TableColumn::new("Day_Change_%", numbers(events, HighEvent::day_change_percent)),
            TableColumn::new("52W_High", numbers(events, |e| e.trailing_52w_high)),
            TableColumn::new(
                "Previous_High_Date",
                Values::Date(events.iter().map(|e| e.trailing_52w_high_date).collect()),
            ),
            TableColumn::new(
                "Days_Since_Prev_High",
                Values::Int(events.iter().map(|e| e.days_since_prior_high).collect()),
            ),
            TableColumn::new(
                "New_High",
                Values::Text(events.iter().map(|e| new_high_label(e.classification).to_string()).collect()),
            ),
        ];
        Self { columns }
    }

    /// Table of near-high records in the given order.
    #[must_use]
    pub fn near_high(records: &[NearHighRecord]) -> Self {
        let columns = vec![
            TableColumn::new(
                "Stock",
                Values::Text(records.iter().map(|r| r.symbol.display_name().to_string()).collect()),
            ),
            TableColumn::new("Current_Price", numbers(records, |r| r.current_price)),
            TableColumn::new("52W_High", numbers(records, |r| r.week_52_high)),
            TableColumn::new("52W_Low", numbers(records, |r| r.week_52_low)),
            TableColumn::new("Distance_from_High_%", numbers(records, |r| r.distance_percent)),
            TableColumn::new("Performance_52W_%", numbers(records, |r| r.performance_52w_percent)),
        ];
        Self { columns }
    }

    /// The columns in output order.
    #[must_use]
    pub fn columns(&self) -> &[TableColumn] {
        &self.columns
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Formatted text of one cell.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<String> {
        let col = self.columns.get(column)?;
        (row < col.values.len()).then(|| col.values.format(row))
    }

    /// Converts the table into a polars frame with typed columns.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Frame`] if polars rejects a column.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let name = c.name.into();
                match &c.values {
                    Values::Text(v) => Ok(Column::new(name, v)),
                    Values::Int(v) => Ok(Column::new(name, v)),
                    Values::Number(v) => Ok(Column::new(name, v)),
                    Values::Date(v) => {
                        let days: Vec<i32> = v
                            .iter()
                            .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
                            .collect();
                        Column::new(name, days).cast(&DataType::Date).map_err(frame_error)
                    }
                }
            })
            .collect::<Result<Vec<_>>>()?;
        DataFrame::new(columns).map_err(frame_error)
    }
}

/// Label used in the `New_High` column.
#[must_use]
pub const fn new_high_label(classification: Classification) -> &'static str {
    match classification {
        Classification::New => "Yes",
        Classification::Matched => "Matched",
    }
}

pub(crate) fn frame_error(e: polars::prelude::PolarsError) -> ReportError {
    ReportError::Frame(e.to_string())
}

/// Fixed-width text with right-aligned columns.
impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.len();
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| (0..rows).map(|r| c.values.format(r)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, values)| values.iter().map(String::len).fold(c.name.len(), usize::max))
            .collect();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:>w$}", c.name, w = *w))
            .collect();
        writeln!(f, "{}", header.join("  "))?;

        for row in 0..rows {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(values, w)| format!("{:>w$}", values[row], w = *w))
                .collect();
            writeln!(f, "{}", line.join("  "))?;
        }
        Ok(())
    }
}
