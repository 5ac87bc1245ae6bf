#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/highs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance daily price provider.
//!
//! Implements [`DataProvider`] and [`PriceDataProvider`] from `highs-core`
//! on top of Yahoo Finance's chart API.
//!
//! # Features
//!
//! - Daily OHLCV bars for any Yahoo symbol (`RELIANCE.NS`, `AAPL`, ...)
//! - Bars dated in the exchange's local calendar using the reported GMT offset
//! - Built-in rate limiting (1 request per second by default)
//!
//! # Example
//!
//! ```no_run
//! use highs_yahoo::YahooProvider;
//! use highs_core::{PriceDataProvider, Symbol};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> highs_core::Result<()> {
//! let provider = YahooProvider::new();
//! let symbol = Symbol::new("RELIANCE.NS");
//! let start = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 9, 26).unwrap();
//!
//! let series = provider.fetch_series(&symbol, start, end).await?;
//! println!("Fetched {} bars", series.len());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use highs_core::{DataError, DataProvider, PriceDataProvider, Result, Symbol};
use polars::prelude::*;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, instrument};

const CHART_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Minimum spacing between two chart requests.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

const PROVIDER_NAME: &str = "Yahoo Finance";

/// Days between 0001-01-01 and 1970-01-01; polars dates count from the latter.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const SECONDS_PER_DAY: i64 = 86_400;

/// Hands out request slots at least `interval` apart.
#[derive(Debug)]
struct Pacer {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl Pacer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits for this caller's slot.
    async fn wait(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = next.map_or(now, |at| at.max(now));
            *next = Some(slot + self.interval);
            slot
        };
        if slot > Instant::now() {
            debug!(wait_ms = (slot - Instant::now()).as_millis() as u64, "Pacing Yahoo request");
            sleep_until(slot).await;
        }
    }
}

/// Daily bars from Yahoo Finance's v8 chart endpoint.
///
/// Requests are paced (one per second by default) no matter how many scan
/// tasks share the provider.
#[derive(Debug)]
pub struct YahooProvider {
    client: reqwest::Client,
    pacer: Pacer,
}

impl YahooProvider {
    /// Provider with the default one-second request spacing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(DEFAULT_MIN_INTERVAL)
    }

    /// Provider whose requests are at least `min_interval` apart.
    #[must_use]
    pub fn with_rate_limit(min_interval: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            pacer: Pacer::new(min_interval),
        }
    }
}

/// Chart URL covering `start` 00:00 UTC through `end` 23:59:59 UTC.
fn chart_url(symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> String {
    let epoch_seconds = |date: NaiveDate| i64::from(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) * SECONDS_PER_DAY;
    let period1 = epoch_seconds(start);
    let period2 = epoch_seconds(end) + SECONDS_PER_DAY - 1;
    format!("{CHART_API_URL}/{symbol}?period1={period1}&period2={period2}&interval=1d&events=history")
}

/// Maps HTTP failures onto [`DataError`].
fn check_status(symbol: &Symbol, status: StatusCode) -> Result<()> {
    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(DataError::RateLimited {
            provider: PROVIDER_NAME.to_string(),
            retry_after: Some(Duration::from_secs(60)),
        }),
        StatusCode::NOT_FOUND => Err(DataError::SymbolNotFound(symbol.to_string())),
        s if s.is_success() => Ok(()),
        s => Err(DataError::Network(format!("HTTP {s} for {symbol}"))),
    }
}

/// Turns a chart payload into the provider frame layout.
///
/// Rows keep Yahoo's nulls; [`TimeSeries::from_frame`](highs_core::TimeSeries::from_frame)
/// drops them.
fn chart_frame(symbol: &Symbol, response: ChartResponse) -> Result<DataFrame> {
    if let Some(error) = response.chart.error {
        return Err(if error.code == "Not Found" {
            DataError::SymbolNotFound(symbol.to_string())
        } else {
            DataError::Other(format!("{}: {}", error.code, error.description))
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(DataError::SymbolNotFound(symbol.to_string()));
    };

    let timestamps = data.timestamp.unwrap_or_default();
    if timestamps.is_empty() {
        return Err(DataError::DataNotAvailable {
            symbol: symbol.to_string(),
            start: "N/A".to_string(),
            end: "N/A".to_string(),
        });
    }
    let Some(quote) = data.indicators.quote.into_iter().next() else {
        return Err(DataError::Parse(format!("{symbol}: chart has no quote block")));
    };

    let rows = timestamps.len();
    let lengths = [quote.open.len(), quote.high.len(), quote.low.len(), quote.close.len(), quote.volume.len()];
    if lengths.iter().any(|&len| len != rows) {
        return Err(DataError::Parse(format!(
            "{symbol}: quote arrays do not match {rows} timestamps"
        )));
    }

    let offset = data.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let days = timestamps
        .iter()
        .map(|&ts| {
            local_date(ts, offset)
                .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
                .ok_or_else(|| DataError::Parse(format!("{symbol}: bad timestamp {ts}")))
        })
        .collect::<Result<Vec<i32>>>()?;

    let polars_err = |e: PolarsError| DataError::Other(e.to_string());
    DataFrame::new(vec![
        Column::new("symbol".into(), vec![symbol.as_str(); rows]),
        Column::new("date".into(), days).cast(&DataType::Date).map_err(polars_err)?,
        Column::new("open".into(), quote.open),
        Column::new("high".into(), quote.high),
        Column::new("low".into(), quote.low),
        Column::new("close".into(), quote.close),
        Column::new("volume".into(), quote.volume),
    ])
    .map_err(polars_err)
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Yahoo Finance daily OHLCV provider"
    }
}

#[async_trait]
impl PriceDataProvider for YahooProvider {
    #[instrument(skip(self), fields(symbol = %symbol))]
    async fn fetch_daily(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> Result<DataFrame> {
        if start > end {
            return Err(DataError::InvalidParameter(format!(
                "start {start} is after end {end}"
            )));
        }

        self.pacer.wait().await;
        let url = chart_url(symbol, start, end);
        debug!(%url, "Requesting chart");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;
        check_status(symbol, response.status())?;

        let payload: ChartResponse = response
            .json()
            .await
            .map_err(|e| DataError::Parse(e.to_string()))?;
        let frame = chart_frame(symbol, payload)?;
        debug!(rows = frame.height(), "Parsed chart response");
        Ok(frame)
    }
}

/// Converts a Unix timestamp to the calendar date at the exchange.
fn local_date(timestamp: i64, gmt_offset_secs: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp(timestamp.checked_add(gmt_offset_secs)?, 0).map(|dt| dt.date_naive())
}

// Chart endpoint payload. Only the fields the scanner reads are modelled.

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}
