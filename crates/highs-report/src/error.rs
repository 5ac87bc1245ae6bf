//! Error types for report output.

use thiserror::Error;

/// Errors raised while writing or sending a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// polars rejected the table or failed to write it.
    #[error("Frame error: {0}")]
    Frame(String),

    /// Excel workbook error.
    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    /// Building or sending the email failed.
    #[error("Email error: {0}")]
    Email(String),

    /// Email settings are missing or invalid.
    #[error("Email not configured: {0}")]
    EmailConfig(String),
}

/// Result type alias using [`ReportError`].
pub type Result<T> = std::result::Result<T, ReportError>;
