//! Yahoo Finance data provider.
//!
//! Price history comes from the v8 chart API. Company metrics come from the
//! v10 quoteSummary API, which needs a session cookie plus a crumb token;
//! both are obtained lazily on the first profile lookup and reused.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. One request per call: no retries, no backoff.

use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, MarketDataProvider, MarketQuery};
use crate::domain::{CompanyProfile, PriceBar, PriceSeries, SamplingInterval};

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const SUMMARY_BASE: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// Yahoo Finance v10 quoteSummary API response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SummaryModules {
    price: PriceModule,
    summary_detail: SummaryDetailModule,
    financial_data: FinancialDataModule,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PriceModule {
    market_cap: RawValue,
    regular_market_price: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: RawValue,
    dividend_yield: RawValue,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FinancialDataModule {
    current_price: RawValue,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`; absent values
/// come back as `{}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawValue {
    raw: Option<f64>,
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            crumb: Mutex::new(None),
        })
    }

    /// Build the chart API URL. The end date is exclusive.
    fn chart_url(query: &MarketQuery) -> String {
        let start_ts = midnight_ts(query.range.start);
        let end_ts = midnight_ts(query.range.end);
        format!(
            "{CHART_BASE}/{symbol}?period1={start_ts}&period2={end_ts}&interval={interval}\
             &includeAdjustedClose=true&events=div%2Csplits",
            symbol = query.symbol,
            interval = query.interval.as_str(),
        )
    }

    /// Parse the chart API response into a series.
    ///
    /// A "Not Found" error or a result without timestamps means the provider
    /// has no rows for the request, which yields an empty series.
    fn parse_chart(
        symbol: &str,
        interval: SamplingInterval,
        resp: ChartResponse,
    ) -> Result<PriceSeries, DataError> {
        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => {
                return Ok(PriceSeries::new(symbol, interval, Vec::new()));
            }
            (None, Some(err)) => {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                )));
            }
            (None, None) => {
                return Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                ));
            }
        };

        let Some(data) = result.into_iter().next() else {
            return Ok(PriceSeries::new(symbol, interval, Vec::new()));
        };
        let Some(timestamps) = data.timestamp else {
            return Ok(PriceSeries::new(symbol, interval, Vec::new()));
        };

        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Rows with no prices at all are non-trading placeholders
            if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }

        Ok(PriceSeries::new(symbol, interval, bars))
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<CompanyProfile, DataError> {
        let modules = match (resp.quote_summary.result, resp.quote_summary.error) {
            (Some(result), _) => result.into_iter().next().unwrap_or_default(),
            (None, Some(err)) if err.code == "Not Found" => {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            (None, Some(err)) => {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                )));
            }
            (None, None) => SummaryModules::default(),
        };

        Ok(CompanyProfile {
            current_price: modules
                .financial_data
                .current_price
                .raw
                .or(modules.price.regular_market_price.raw),
            market_cap: modules.price.market_cap.raw,
            trailing_pe: modules.summary_detail.trailing_pe.raw,
            dividend_yield: modules.summary_detail.dividend_yield.raw,
        })
    }

    /// Cookie + crumb handshake. The crumb is cached for the provider's lifetime.
    fn crumb(&self) -> Result<String, DataError> {
        if let Some(crumb) = self.crumb.lock().ok().and_then(|c| c.clone()) {
            return Ok(crumb);
        }

        // The cookie endpoint answers 404 but still sets the session cookie
        self.client
            .get(COOKIE_URL)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let resp = self
            .client
            .get(CRUMB_URL)
            .header("referer", "https://finance.yahoo.com/")
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        check_status(resp.status())?;

        let crumb = resp
            .text()
            .map_err(|e| DataError::ResponseFormatChanged(format!("crumb body: {e}")))?
            .trim()
            .to_string();
        if crumb.is_empty() || crumb.len() > 64 || crumb.contains('<') {
            return Err(DataError::AuthenticationRequired(
                "Yahoo did not issue a crumb".into(),
            ));
        }

        if let Ok(mut slot) = self.crumb.lock() {
            *slot = Some(crumb.clone());
        }
        Ok(crumb)
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, query: &MarketQuery) -> Result<PriceSeries, DataError> {
        let url = Self::chart_url(query);
        tracing::debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        // 400 and 404 carry a JSON error body worth reporting
        if !status.is_success()
            && status != reqwest::StatusCode::BAD_REQUEST
            && status != reqwest::StatusCode::NOT_FOUND
        {
            check_status(status)?;
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!(
                "failed to parse chart for {}: {e}",
                query.symbol
            ))
        })?;

        Self::parse_chart(&query.symbol, query.interval, chart)
    }

    fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile, DataError> {
        let crumb = self.crumb()?;
        let url = format!("{SUMMARY_BASE}/{symbol}");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("modules", "price,summaryDetail,financialData"),
                ("crumb", crumb.as_str()),
            ])
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Stale crumb; the next lookup performs a fresh handshake
            if let Ok(mut slot) = self.crumb.lock() {
                *slot = None;
            }
        }
        if status != reqwest::StatusCode::NOT_FOUND {
            check_status(status)?;
        }

        let summary: SummaryResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse summary for {symbol}: {e}"))
        })?;

        Self::parse_summary(symbol, summary)
    }
}

fn midnight_ts(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

fn check_status(status: reqwest::StatusCode) -> Result<(), DataError> {
    if status.is_success() {
        return Ok(());
    }
    Err(match status {
        reqwest::StatusCode::TOO_MANY_REQUESTS => DataError::RateLimited,
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            DataError::AuthenticationRequired(format!("HTTP {status}"))
        }
        other => DataError::Http {
            status: other.as_u16(),
        },
    })
}
