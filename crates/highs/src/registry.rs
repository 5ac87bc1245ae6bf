//! Data provider registry with fallback and a per-symbol deadline.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::timeout;
use tracing::{debug, warn};

use highs_core::{DataError, PriceDataProvider, Result, Symbol, TimeSeries};

/// Registry for price providers with automatic fallback.
///
/// Providers are tried in registration order until one returns a valid
/// series. Each attempt is bounded by the fetch timeout so one unresponsive
/// symbol cannot stall a scan.
///
/// # Example
///
/// ```rust,ignore
/// use highs::{DataProviderRegistry, Symbol};
/// use chrono::NaiveDate;
/// use std::time::Duration;
///
/// let registry = DataProviderRegistry::new()
///     .with_timeout(Duration::from_secs(20))
///     .with_yahoo();
///
/// let series = registry.fetch_series(
///     &Symbol::new("INFY.NS"),
///     NaiveDate::from_ymd_opt(2024, 8, 18).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 9, 26).unwrap(),
/// ).await?;
/// ```
#[derive(Default)]
pub struct DataProviderRegistry {
    price_providers: Vec<Arc<dyn PriceDataProvider>>,
    fetch_timeout: Option<Duration>,
}

impl std::fmt::Debug for DataProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProviderRegistry")
            .field(
                "price_providers",
                &self
                    .price_providers
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>(),
            )
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

impl DataProviderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound every provider call by `fetch_timeout`.
    #[must_use]
    pub fn with_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = Some(fetch_timeout);
        self
    }

    /// Register a price data provider.
    pub fn register_price(&mut self, provider: Arc<dyn PriceDataProvider>) {
        debug!(
            provider = provider.name(),
            description = provider.description(),
            "Registering price provider"
        );
        self.price_providers.push(provider);
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.price_providers.is_empty()
    }

    /// Fetch a validated daily series, trying providers in order until one succeeds.
    pub async fn fetch_series(&self, symbol: &Symbol, start: NaiveDate, end: NaiveDate) -> Result<TimeSeries> {
        if self.is_empty() {
            return Err(DataError::ProviderNotConfigured(
                "No price providers registered".to_string(),
            ));
        }

        let mut last_error = None;
        for provider in &self.price_providers {
            debug!(
                provider = provider.name(),
                symbol = %symbol,
                "Fetching daily bars"
            );

            let fetch = provider.fetch_series(symbol, start, end);
            let result = match self.fetch_timeout {
                Some(limit) => timeout(limit, fetch)
                    .await
                    .unwrap_or_else(|_| Err(DataError::Timeout(limit, symbol.to_string()))),
                None => fetch.await,
            };

            match result {
                Ok(series) => return Ok(series),
                Err(e) => {
                    if self.price_providers.len() > 1 {
                        warn!(
                            provider = provider.name(),
                            error = %e,
                            "Provider failed, trying next"
                        );
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| DataError::Other("All providers failed with no error".to_string())))
    }

    /// Add the Yahoo Finance provider.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(mut self) -> Self {
        self.register_price(Arc::new(highs_yahoo::YahooProvider::new()));
        self
    }
}
