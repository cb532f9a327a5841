//! Text formatting for tables and metric tiles.

use crate::chart::BarChartData;
use crate::domain::{CompanyProfile, PriceColumn, PriceSeries};
use crate::stats::{Describe, STAT_LABELS};
use crate::table::TextTable;

/// Shown wherever a metric is missing.
pub const PLACEHOLDER: &str = "N/A";

/// Two decimals; NaN is spelled out.
pub fn fmt2(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Round to an integer and group digits by thousands: `2900000` → `2,900,000`.
pub fn with_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// The four metric tiles of the company panel, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub current_price: String,
    pub market_cap: String,
    pub trailing_pe: String,
    pub dividend_yield: String,
}

impl ProfileView {
    /// Absent metrics become the placeholder; nothing is computed on them.
    pub fn from_profile(profile: &CompanyProfile) -> Self {
        Self {
            current_price: profile
                .current_price
                .map(|v| format!("${v:.2}"))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            market_cap: profile
                .market_cap
                .map(|v| format!("${}", with_thousands(v)))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            trailing_pe: profile
                .trailing_pe
                .map(fmt2)
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            dividend_yield: profile
                .dividend_yield
                .map(|v| format!("{:.2}%", v * 100.0))
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
        }
    }

    /// `(label, value)` pairs in display order.
    pub fn tiles(&self) -> [(&'static str, &str); 4] {
        [
            ("Current price", self.current_price.as_str()),
            ("Market cap", self.market_cap.as_str()),
            ("P/E (trailing)", self.trailing_pe.as_str()),
            ("Dividend yield", self.dividend_yield.as_str()),
        ]
    }
}

/// Date index plus every numeric column, two decimals throughout.
pub fn price_table(series: &PriceSeries, rows: usize) -> TextTable {
    let mut headers = vec!["Date".to_string()];
    headers.extend(PriceColumn::ALL.iter().map(|c| c.name().to_string()));

    let mut table = TextTable::new(headers);
    for bar in series.tail(rows) {
        let mut row = vec![bar.date.format("%Y-%m-%d").to_string()];
        row.extend(PriceColumn::ALL.iter().map(|&c| fmt2(bar.value(c))));
        table.rows.push(row);
    }
    table
}

/// Statistic labels down the side, one column per described column.
pub fn describe_table(describe: &Describe) -> TextTable {
    let mut headers = vec![String::new()];
    headers.extend(describe.column_names().into_iter().map(str::to_owned));

    let mut table = TextTable::new(headers);
    for (i, label) in STAT_LABELS.iter().enumerate() {
        let mut row = vec![(*label).to_string()];
        row.extend(describe.columns.iter().map(|(_, s)| fmt2(s.values()[i])));
        table.rows.push(row);
    }
    table
}

/// Bar heights as a grid: one row per X category, one column per group.
pub fn bar_table(data: &BarChartData) -> TextTable {
    let mut headers = vec![data.x_label.clone()];
    if data.is_grouped() {
        headers.extend(data.groups.iter().cloned());
    } else {
        headers.push(format!("mean {}", data.y_label));
    }

    let mut table = TextTable::new(headers);
    for (c, category) in data.categories.iter().enumerate() {
        let mut row = vec![category.clone()];
        row.extend((0..data.groups.len()).map(|g| {
            data.value(g, c)
                .map(fmt2)
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        }));
        table.rows.push(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_grouping() {
        assert_eq!(with_thousands(0.0), "0");
        assert_eq!(with_thousands(999.0), "999");
        assert_eq!(with_thousands(1000.0), "1,000");
        assert_eq!(with_thousands(2_900_000_000_000.0), "2,900,000,000,000");
        assert_eq!(with_thousands(-1234567.4), "-1,234,567");
    }

    #[test]
    fn fmt2_handles_nan() {
        assert_eq!(fmt2(1.005), "1.00");
        assert_eq!(fmt2(f64::NAN), "NaN");
    }

    #[test]
    fn full_profile_formats_every_tile() {
        let view = ProfileView::from_profile(&CompanyProfile {
            current_price: Some(189.3),
            market_cap: Some(2.9e12),
            trailing_pe: Some(29.456),
            dividend_yield: Some(0.0051),
        });
        assert_eq!(view.current_price, "$189.30");
        assert_eq!(view.market_cap, "$2,900,000,000,000");
        assert_eq!(view.trailing_pe, "29.46");
        assert_eq!(view.dividend_yield, "0.51%");
    }

    #[test]
    fn missing_metrics_render_placeholder() {
        let view = ProfileView::from_profile(&CompanyProfile::default());
        for (_, value) in view.tiles() {
            assert_eq!(value, PLACEHOLDER);
        }
    }

    #[test]
    fn bar_table_has_one_column_per_group() {
        let data = BarChartData {
            title: "total_bill vs day grouped by sex".into(),
            x_label: "day".into(),
            y_label: "total_bill".into(),
            categories: vec!["Sun".into(), "Sat".into()],
            groups: vec!["Female".into(), "Male".into()],
            values: vec![vec![Some(10.0), None], vec![Some(25.5), Some(30.0)]],
        };
        let table = bar_table(&data);
        assert_eq!(table.headers, vec!["day", "Female", "Male"]);
        assert_eq!(table.rows[0], vec!["Sun", "10.00", "25.50"]);
        assert_eq!(table.rows[1], vec!["Sat", "N/A", "30.00"]);
    }
}
