//! Market data flow: query → memoized fetch → empty check → report.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::chart::LineChartData;
use crate::data::{MarketDataProvider, MarketQuery, MemoCache, MemoStats};
use crate::domain::PriceSeries;
use crate::format::{describe_table, price_table, ProfileView};
use crate::stats::Describe;
use crate::table::TextTable;

/// Most recent rows shown in the preview table.
pub const PREVIEW_ROWS: usize = 5;

pub const EMPTY_WARNING: &str = "No data returned. Try different settings.";

/// User-facing text for any failure, carrying the error's description.
pub fn failure_message(err: &dyn Display) -> String {
    format!("An error occurred: {err}")
}

/// Company metrics lookup result. A failure here does not hide the
/// sections derived before it.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileOutcome {
    Ready(ProfileView),
    Failed(String),
}

/// Everything the market panel shows for a non-empty series.
#[derive(Debug, Clone)]
pub struct MarketReport {
    pub query: MarketQuery,
    pub series: Arc<PriceSeries>,
    pub preview: TextTable,
    pub chart: LineChartData,
    pub stats: Describe,
    pub stats_table: TextTable,
    pub profile: ProfileOutcome,
}

/// Result of one run of the market flow.
#[derive(Debug, Clone)]
pub enum MarketOutcome {
    Ready(Box<MarketReport>),
    Empty { query: MarketQuery },
    Failed { query: MarketQuery, message: String },
}

impl MarketOutcome {
    pub fn report(&self) -> Option<&MarketReport> {
        match self {
            Self::Ready(report) => Some(report),
            _ => None,
        }
    }

    pub fn query(&self) -> &MarketQuery {
        match self {
            Self::Ready(report) => &report.query,
            Self::Empty { query } | Self::Failed { query, .. } => query,
        }
    }
}

/// Provider plus the per-session memo cache of fetched series.
pub struct MarketFlow {
    provider: Arc<dyn MarketDataProvider>,
    cache: MemoCache<MarketQuery, PriceSeries>,
}

impl MarketFlow {
    pub fn new(provider: Arc<dyn MarketDataProvider>, cache_capacity: usize, cache_ttl: Duration) -> Self {
        Self {
            provider,
            cache: MemoCache::new(cache_capacity, cache_ttl),
        }
    }

    pub fn cache_stats(&self) -> MemoStats {
        self.cache.stats()
    }

    /// Fetch (or reuse) the series for `query`.
    pub fn series(&mut self, query: &MarketQuery) -> Result<Arc<PriceSeries>, crate::data::DataError> {
        let provider = Arc::clone(&self.provider);
        let before = self.cache.stats().hits;
        let series = self
            .cache
            .get_or_try_insert_with(query, || provider.fetch(query))?;
        if self.cache.stats().hits > before {
            tracing::debug!(symbol = %query.symbol, "series served from cache");
        } else {
            tracing::info!(
                provider = provider.name(),
                symbol = %query.symbol,
                start = %query.range.start,
                end = %query.range.end,
                interval = %query.interval,
                rows = series.len(),
                "fetched price series"
            );
        }
        Ok(series)
    }

    /// Run the whole flow for one query.
    pub fn run(&mut self, query: MarketQuery) -> MarketOutcome {
        if query.range.is_inverted() {
            tracing::warn!(start = %query.range.start, end = %query.range.end, "inverted date range passed to provider");
        }

        let series = match self.series(&query) {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(error = %e, "market fetch failed");
                return MarketOutcome::Failed {
                    message: failure_message(&e),
                    query,
                };
            }
        };

        if series.is_empty() {
            return MarketOutcome::Empty { query };
        }

        let stats = Describe::of_series(&series);
        let profile = match self.provider.fetch_profile(&query.symbol) {
            Ok(profile) => ProfileOutcome::Ready(ProfileView::from_profile(&profile)),
            Err(e) => {
                tracing::warn!(error = %e, "profile lookup failed");
                ProfileOutcome::Failed(failure_message(&e))
            }
        };

        MarketOutcome::Ready(Box::new(MarketReport {
            preview: price_table(&series, PREVIEW_ROWS),
            chart: LineChartData::close_of(&series),
            stats_table: describe_table(&stats),
            stats,
            profile,
            series,
            query,
        }))
    }
}
