#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/highs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Plain-text email reports.
pub mod email;
/// Error types for report output.
pub mod error;
/// Result tables.
pub mod table;
/// CSV and Excel files.
pub mod writer;

#[cfg(test)]
mod testing;

pub use email::EmailConfig;
pub use error::{ReportError, Result};
pub use table::{ReportTable, TableColumn, Values};
pub use writer::{DEFAULT_FILE_PREFIX, report_path, write_csv, write_excel};
