//! Market data provider trait and structured error types.
//!
//! The `MarketDataProvider` trait abstracts over the remote source so the
//! memo cache and the dashboard flows can be exercised with a mock in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CompanyProfile, DateRange, PriceSeries, SamplingInterval};

/// Everything that determines a price-history fetch.
///
/// Passed by value into acquisition; the memo cache key is derived from
/// these fields and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketQuery {
    pub symbol: String,
    pub range: DateRange,
    pub interval: SamplingInterval,
}

impl MarketQuery {
    pub fn new(symbol: impl Into<String>, range: DateRange, interval: SamplingInterval) -> Self {
        Self {
            symbol: symbol.into(),
            range,
            interval,
        }
    }
}

/// Structured error types for data operations.
///
/// Displayable in both CLI and TUI contexts.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider")]
    RateLimited,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("HTTP {status} from provider")]
    Http { status: u16 },

    #[error("data error: {0}")]
    Other(String),
}

/// A source of price history and company metrics.
///
/// Implementations return an empty `PriceSeries` when the provider has no
/// rows for the request; that is not an error.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch OHLCV rows for the query.
    fn fetch(&self, query: &MarketQuery) -> Result<PriceSeries, DataError>;

    /// Look up headline company metrics by symbol.
    fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError>;
}
