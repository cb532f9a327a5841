//! Price bars and the series they form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::SamplingInterval;

/// One OHLCV row of a price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Value of a numeric column by name, as `f64`.
    pub fn value(&self, column: PriceColumn) -> f64 {
        match column {
            PriceColumn::Open => self.open,
            PriceColumn::High => self.high,
            PriceColumn::Low => self.low,
            PriceColumn::Close => self.close,
            PriceColumn::Volume => self.volume as f64,
        }
    }
}

/// The numeric columns of a price series, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceColumn {
    pub const ALL: [Self; 5] = [Self::Open, Self::High, Self::Low, Self::Close, Self::Volume];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }
}

/// Ordered price history for one symbol, oldest row first.
///
/// Built once per acquisition and never mutated afterwards; the memo cache
/// hands out shared references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub interval: SamplingInterval,
    pub bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, interval: SamplingInterval, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The `n` most recent rows, oldest first.
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// All values of one column, NaNs included.
    pub fn column(&self, column: PriceColumn) -> Vec<f64> {
        self.bars.iter().map(|b| b.value(column)).collect()
    }

    /// `(date, close)` points for the closing-price chart, NaN closes dropped.
    pub fn close_points(&self) -> Vec<(NaiveDate, f64)> {
        self.bars
            .iter()
            .filter(|b| !b.close.is_nan())
            .map(|b| (b.date, b.close))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn series_sorts_rows_by_date() {
        let s = PriceSeries::new("AAPL", SamplingInterval::Daily, vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);
        let closes: Vec<f64> = s.bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn tail_is_capped_by_length() {
        let s = PriceSeries::new("AAPL", SamplingInterval::Daily, vec![bar(1, 1.0), bar(2, 2.0)]);
        assert_eq!(s.tail(5).len(), 2);
        assert_eq!(s.tail(1)[0].close, 2.0);
        assert!(PriceSeries::new("AAPL", SamplingInterval::Daily, vec![]).tail(5).is_empty());
    }

    #[test]
    fn close_points_skip_nan() {
        let mut b = bar(2, 2.0);
        b.close = f64::NAN;
        let s = PriceSeries::new("AAPL", SamplingInterval::Daily, vec![bar(1, 1.0), b]);
        assert_eq!(s.close_points().len(), 1);
    }

    #[test]
    fn volume_column_is_numeric() {
        let s = PriceSeries::new("AAPL", SamplingInterval::Daily, vec![bar(1, 1.0)]);
        assert_eq!(s.column(PriceColumn::Volume), vec![1_000.0]);
    }
}
