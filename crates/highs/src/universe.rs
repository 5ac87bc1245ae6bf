//! The symbol universe a scan walks.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use highs_core::Symbol;

/// Yahoo suffix for National Stock Exchange of India listings.
pub const NSE_SUFFIX: &str = ".NS";

/// Nifty 100 constituents (September 2025), NSE tickers without suffix.
pub const NIFTY_100: &[&str] = &[
    "ABB", "ADANIENSOL", "ADANIENT", "ADANIGREEN", "ADANIPORTS", "ADANIPOWER", "AMBUJACEM",
    "APOLLOHOSP", "ASIANPAINT", "AXISBANK", "BAJAJ-AUTO", "BAJAJFINSV", "BAJAJHFL", "BAJAJHLDNG",
    "BAJFINANCE", "BANKBARODA", "BEL", "BHARTIARTL", "BOSCHLTD", "BPCL", "BRITANNIA", "CANBK",
    "CGPOWER", "CHOLAFIN", "CIPLA", "COALINDIA", "DABUR", "DIVISLAB", "DLF", "DMART",
    "DRREDDY", "EICHERMOT", "ETERNAL", "GAIL", "GODREJCP", "GRASIM", "HAL",
    "HAVELLS", "HCLTECH", "HDFCBANK", "HDFCLIFE", "HEROMOTOCO", "HINDALCO", "HINDUNILVR",
    "HYUNDAI", "ICICIBANK", "ICICIGI", "ICICIPRULI", "INDHOTEL", "INDIGO",
    "INDUSINDBK", "INFY", "IOC", "IRFC", "ITC", "JINDALSTEL", "JIOFIN",
    "JSWENERGY", "JSWSTEEL", "KOTAKBANK", "LICI", "LODHA", "LT", "LTIM",
    "M&M", "MARUTI", "MOTHERSON", "NAUKRI", "NESTLEIND", "NTPC", "ONGC", "PFC",
    "PIDILITIND", "PNB", "POWERGRID", "RECLTD", "RELIANCE", "SBILIFE", "SBIN", "SHREECEM",
    "SHRIRAMFIN", "SIEMENS", "SUNPHARMA", "SWIGGY", "TATACONSUM", "TATAMOTORS", "TATAPOWER",
    "TATASTEEL", "TCS", "TECHM", "TITAN", "TORNTPHARM", "TRENT", "TVSMOTOR", "ULTRACEMCO",
    "UNITDSPR", "VBL", "VEDL", "WIPRO", "ZYDUSLIFE",
];

/// An ordered, duplicate-free list of symbols.
///
/// Order is preserved from construction; it decides the order symbols are
/// fetched in, not the order results are reported in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    name: String,
    symbols: Vec<Symbol>,
}

impl Universe {
    /// The Nifty 100 with Yahoo's NSE suffix applied.
    #[must_use]
    pub fn nifty100() -> Self {
        Self::from_symbols(
            "nifty100",
            NIFTY_100.iter().map(|s| format!("{s}{NSE_SUFFIX}")),
        )
    }

    /// Create a universe from a list of symbols; later duplicates are dropped.
    pub fn from_symbols<I, S>(name: impl Into<String>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(Into::into)
            .filter(|s: &Symbol| seen.insert(s.clone()))
            .collect();
        Self {
            name: name.into(),
            symbols,
        }
    }

    /// Load a universe from a file with one symbol per line.
    ///
    /// Blank lines and `#` comments are skipped. When `suffix` is given it is
    /// appended to every symbol that does not already carry a `.` suffix.
    pub fn from_file(path: &Path, suffix: Option<&str>) -> std::io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        let symbols = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| match suffix {
                Some(sfx) if !line.contains('.') => format!("{line}{sfx}"),
                _ => line.to_string(),
            });
        Ok(Self::from_symbols(name, symbols))
    }

    /// Name used in report file names.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbols in scan order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the universe has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::nifty100()
    }
}
