//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers every way a single symbol can
//! fail during a scan: fetching, parsing, validating or timing out. None of these
//! are fatal to a scan; the caller records them per symbol and moves on.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching or validating price data.
#[derive(Error, Debug)]
pub enum DataError {
    /// Network-related errors (connection failures, HTTP status errors, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Data is not available for the requested symbol and date range.
    #[error("Data not available for {symbol} in range {start} to {end}")]
    DataNotAvailable {
        /// The symbol that was requested.
        symbol: String,
        /// Start of the requested date range.
        start: String,
        /// End of the requested date range.
        end: String,
    },

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A bar violated the OHLC or ordering invariants.
    #[error("Invalid bar for {symbol} on {date}: {reason}")]
    InvalidBar {
        /// The symbol the bar belongs to.
        symbol: String,
        /// Date of the offending bar.
        date: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The data source did not answer within the per-symbol deadline.
    #[error("Timed out after {0:?} fetching {1}")]
    Timeout(Duration, String),

    /// The requested provider is not configured.
    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl DataError {
    /// Returns the error message cut to at most `max_chars` characters.
    ///
    /// Provider errors can embed whole response bodies; scan logs only need the head.
    #[must_use]
    pub fn truncated(&self, max_chars: usize) -> String {
        let message = self.to_string();
        match message.char_indices().nth(max_chars) {
            Some((idx, _)) => message[..idx].to_string(),
            None => message,
        }
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
