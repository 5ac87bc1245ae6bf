//! Target-week calculation.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which days of the target week are scanned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekVariant {
    /// Monday through Friday.
    #[default]
    Trading,
    /// Monday through Sunday.
    Calendar,
}

impl WeekVariant {
    /// Days from the Monday to the last day of the window.
    #[must_use]
    pub const fn span_days(self) -> u64 {
        match self {
            Self::Trading => 4,
            Self::Calendar => 6,
        }
    }
}

/// An inclusive `[start, end]` date range starting on a Monday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    /// The Monday that opens the window.
    pub start: NaiveDate,
    /// Last day of the window, inclusive.
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Returns true if `date` falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// First date to fetch so that trailing baselines for the window are complete.
    ///
    /// Returns `None` if that date precedes [`NaiveDate::MIN`].
    #[must_use]
    pub fn history_start(&self, buffer_days: u64) -> Option<NaiveDate> {
        self.start.checked_sub_days(Days::new(buffer_days))
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Computes the week `weeks_back` weeks before the one containing `today`.
///
/// `weeks_back = 0` is the current week. The window always starts on a Monday.
/// Returns `None` when the window falls outside the representable calendar.
#[must_use]
pub fn compute_week(today: NaiveDate, weeks_back: u32, variant: WeekVariant) -> Option<WeekWindow> {
    let offset = u64::from(today.weekday().num_days_from_monday());
    let start = today
        .checked_sub_days(Days::new(offset))?
        .checked_sub_days(Days::new(7 * u64::from(weeks_back)))?;
    Some(WeekWindow {
        start,
        end: start.checked_add_days(Days::new(variant.span_days()))?,
    })
}
