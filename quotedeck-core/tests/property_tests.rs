//! Property tests for preview and statistics invariants.
//!
//! Uses proptest to verify:
//! 1. Preview never exceeds five rows and always has the series' columns
//! 2. describe(): count matches non-NaN values, min <= quartiles <= max
//! 3. Absent profile metrics always render as the placeholder
//! 4. Bar chart means stay inside each category's value range

use proptest::prelude::*;

use chrono::NaiveDate;
use quotedeck_core::chart::{BarChartData, ChartRequest};
use quotedeck_core::domain::{CompanyProfile, PriceBar, PriceSeries, SamplingInterval};
use quotedeck_core::format::{price_table, ProfileView, PLACEHOLDER};
use quotedeck_core::stats::{ColumnSummary, Describe, STAT_LABELS};
use quotedeck_core::table::UploadedTable;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_series() -> impl Strategy<Value = PriceSeries> {
    prop::collection::vec((arb_price(), 0u64..10_000_000), 1..40).prop_map(|rows| {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let bars = rows
            .into_iter()
            .enumerate()
            .map(|(i, (close, volume))| PriceBar {
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume,
            })
            .collect();
        PriceSeries::new("TEST", SamplingInterval::Daily, bars)
    })
}

fn arb_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![4 => (-1e6..1e6_f64), 1 => Just(f64::NAN)],
        0..60,
    )
}

// ── 1. Preview shape ────────────────────────────────────────────────

proptest! {
    #[test]
    fn preview_is_bounded_and_complete(series in arb_series()) {
        let table = price_table(&series, 5);
        prop_assert!(table.row_count() <= 5);
        prop_assert_eq!(table.row_count(), series.len().min(5));
        prop_assert_eq!(
            table.headers.clone(),
            vec!["Date", "Open", "High", "Low", "Close", "Volume"]
        );
        for row in &table.rows {
            prop_assert_eq!(row.len(), table.headers.len());
        }
    }

    #[test]
    fn describe_labels_every_column(series in arb_series()) {
        let describe = Describe::of_series(&series);
        prop_assert_eq!(describe.columns.len(), 5);
        for (_, summary) in &describe.columns {
            prop_assert_eq!(summary.count, series.len());
            prop_assert_eq!(summary.values().len(), STAT_LABELS.len());
        }
    }
}

// ── 2. Summary ordering ─────────────────────────────────────────────

proptest! {
    #[test]
    fn summary_is_ordered(values in arb_values()) {
        let s = ColumnSummary::from_values(&values);
        let finite = values.iter().filter(|v| !v.is_nan()).count();
        prop_assert_eq!(s.count, finite);
        if finite > 0 {
            prop_assert!(s.min <= s.q25);
            prop_assert!(s.q25 <= s.median);
            prop_assert!(s.median <= s.q75);
            prop_assert!(s.q75 <= s.max);
            prop_assert!(s.mean >= s.min - 1e-6 && s.mean <= s.max + 1e-6);
        } else {
            prop_assert!(s.mean.is_nan());
        }
        if finite > 1 {
            prop_assert!(s.std >= 0.0);
        }
    }
}

// ── 3. Placeholder safety ───────────────────────────────────────────

proptest! {
    #[test]
    fn absent_metrics_use_placeholder(
        price in prop::option::of(arb_price()),
        cap in prop::option::of(1e6..1e13_f64),
        pe in prop::option::of(0.1..200.0_f64),
        dy in prop::option::of(0.0..0.2_f64),
    ) {
        let view = ProfileView::from_profile(&CompanyProfile {
            current_price: price,
            market_cap: cap,
            trailing_pe: pe,
            dividend_yield: dy,
        });
        prop_assert_eq!(view.current_price == PLACEHOLDER, price.is_none());
        prop_assert_eq!(view.market_cap == PLACEHOLDER, cap.is_none());
        prop_assert_eq!(view.trailing_pe == PLACEHOLDER, pe.is_none());
        prop_assert_eq!(view.dividend_yield == PLACEHOLDER, dy.is_none());
        if dy.is_some() {
            prop_assert!(view.dividend_yield.ends_with('%'));
        }
    }
}

// ── 4. Bar means ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn bar_means_within_category_range(
        rows in prop::collection::vec((0usize..4, 0.0..100.0_f64), 1..30)
    ) {
        let days = ["Thur", "Fri", "Sat", "Sun"];
        let mut csv = String::from("day,total_bill\n");
        for (d, v) in &rows {
            csv.push_str(&format!("{},{:.2}\n", days[*d], v));
        }
        let table = UploadedTable::from_bytes("p.csv", csv.into_bytes()).unwrap();
        let data = BarChartData::from_table(&table, &ChartRequest::new("day", "total_bill", None)).unwrap();

        for (c, name) in data.categories.iter().enumerate() {
            let idx = days.iter().position(|d| d == name).unwrap();
            let vals: Vec<f64> = rows
                .iter()
                .filter(|(d, _)| *d == idx)
                .map(|(_, v)| (v * 100.0).round() / 100.0)
                .collect();
            let lo = vals.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = data.value(0, c).unwrap();
            prop_assert!(mean >= lo - 0.01 && mean <= hi + 0.01);
        }
    }
}
