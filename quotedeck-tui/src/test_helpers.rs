//! Test helpers for building an app over canned market data

use std::sync::Arc;

use chrono::NaiveDate;
use quotedeck_core::data::{DataError, MarketDataProvider, MarketQuery};
use quotedeck_core::domain::{CompanyProfile, DateRange, PriceBar, PriceSeries};
use quotedeck_core::{DashboardConfig, DashboardEvent, Session};

use crate::app::AppState;

/// Monthly bars on the first of each month of 2020.
pub struct CannedProvider;

impl MarketDataProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch(&self, query: &MarketQuery) -> Result<PriceSeries, DataError> {
        let bars = (1..=12)
            .filter_map(|m| NaiveDate::from_ymd_opt(2020, m, 1))
            .filter(|d| *d >= query.range.start && *d < query.range.end)
            .map(|date| PriceBar {
                date,
                open: 75.0,
                high: 80.0,
                low: 70.0,
                close: 77.5,
                volume: 1_000,
            })
            .collect();
        Ok(PriceSeries::new(query.symbol.clone(), query.interval, bars))
    }

    fn fetch_profile(&self, _symbol: &str) -> Result<CompanyProfile, DataError> {
        Ok(CompanyProfile {
            current_price: Some(77.5),
            ..CompanyProfile::default()
        })
    }
}

pub fn test_app() -> AppState {
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
    );
    let session = Session::with_range(DashboardConfig::default(), Arc::new(CannedProvider), range);
    AppState::new(session)
}

/// An app with `csv` uploaded from a temp file; keep the dir alive.
pub fn app_with_upload(csv: &str) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.csv");
    std::fs::write(&path, csv).unwrap();
    let mut app = test_app();
    app.dispatch(DashboardEvent::Upload(path));
    assert!(app.session.upload().is_some());
    (app, dir)
}
