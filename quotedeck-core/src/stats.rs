//! Descriptive statistics: count, mean, std, min, quartiles, max.
//!
//! Matches the usual dataframe `describe()` conventions: NaNs are skipped,
//! `std` is the sample standard deviation (n - 1), and quantiles use linear
//! interpolation between closest ranks.

use crate::domain::{PriceColumn, PriceSeries};

/// Row labels of a statistics table, in display order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize a slice of values, ignoring NaNs.
    pub fn from_values(values: &[f64]) -> Self {
        let mut clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        clean.sort_by(|a, b| a.total_cmp(b));
        let n = clean.len();

        if n == 0 {
            return Self {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mean = clean.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let ss: f64 = clean.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            count: n,
            mean,
            std,
            min: clean[0],
            q25: quantile_sorted(&clean, 0.25),
            median: quantile_sorted(&clean, 0.5),
            q75: quantile_sorted(&clean, 0.75),
            max: clean[n - 1],
        }
    }

    /// Values in `STAT_LABELS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Linear-interpolation quantile of an ascending, NaN-free slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

/// Statistics table: one summary per named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub columns: Vec<(String, ColumnSummary)>,
}

impl Describe {
    /// Describe every numeric column of a price series.
    pub fn of_series(series: &PriceSeries) -> Self {
        Self {
            columns: PriceColumn::ALL
                .iter()
                .map(|&c| (c.name().to_string(), ColumnSummary::from_values(&series.column(c))))
                .collect(),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }
}
