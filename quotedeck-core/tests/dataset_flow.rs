//! Integration tests for upload-and-plot and the tips chart.
//!
//! Tests:
//! 1. Group choices are `none` plus the categorical columns
//! 2. The three-row tips upload previews and titles as expected
//! 3. Parse failures surface as upload errors
//! 4. The tips toggle renders and exports the PNG from a local source
//! 5. Upload charts export as `<y>_vs_<x>.png`

use std::io::Write;
use std::sync::Arc;

use quotedeck_core::data::{DataError, MarketDataProvider, MarketQuery, TipsSource};
use quotedeck_core::domain::{CompanyProfile, PriceSeries};
use quotedeck_core::flow::{PlotOutcome, TipsOutcome, UploadSession, TIPS_EXPORT_NAME};
use quotedeck_core::table::UploadedTable;
use quotedeck_core::{DashboardConfig, DashboardEvent, Recomputed, Session};

const TIPS_CSV: &str = "\
total_bill,tip,sex,smoker,day,time,size
16.99,1.01,Female,No,Sun,Dinner,2
10.34,1.66,Male,No,Sun,Dinner,3
21.01,3.5,Male,No,Sun,Dinner,3
23.68,3.31,Male,No,Sat,Dinner,2
24.59,3.61,Female,No,Sat,Dinner,4
25.29,4.71,Male,No,Thur,Lunch,4
";

/// Unused by these tests; the market flow never runs.
struct NoMarket;

impl MarketDataProvider for NoMarket {
    fn name(&self) -> &str {
        "none"
    }

    fn fetch(&self, query: &MarketQuery) -> Result<PriceSeries, DataError> {
        Ok(PriceSeries::new(query.symbol.clone(), query.interval, Vec::new()))
    }

    fn fetch_profile(&self, _symbol: &str) -> Result<CompanyProfile, DataError> {
        Ok(CompanyProfile::default())
    }
}

fn session_in(dir: &std::path::Path) -> Session {
    let tips_path = dir.join("tips.csv");
    std::fs::write(&tips_path, TIPS_CSV).unwrap();
    let config = DashboardConfig {
        tips_source: TipsSource::File(tips_path),
        export_dir: dir.to_path_buf(),
        ..DashboardConfig::default()
    };
    Session::new(config, Arc::new(NoMarket))
}

#[test]
fn group_options_are_none_plus_categorical() {
    let table = UploadedTable::from_bytes("abc.csv", b"A,B,C\n1,x,2.5\n3,y,4.0\n".to_vec()).unwrap();
    let upload = UploadSession::new(table).unwrap();
    assert_eq!(upload.group_options(), vec![None, Some("B".to_string())]);
    assert_eq!(upload.x_options(), vec!["A", "B", "C"]);
}

#[test]
fn three_row_upload_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());

    let bytes = b"day,total_bill,sex\nSun,16.99,Female\nSun,10.34,Male\nSat,23.68,Male\n".to_vec();
    let changed = session.apply(DashboardEvent::UploadBytes {
        name: "tips3.csv".into(),
        bytes,
    });
    assert_eq!(changed, Recomputed::Upload);

    let upload = session.upload().unwrap();
    assert_eq!(upload.preview().row_count(), 3);
    assert_eq!(upload.preview().headers, vec!["day", "total_bill", "sex"]);
    // selections default to the first column, no group
    assert_eq!(upload.request().unwrap().x, "day");
    assert!(upload.plot().is_none());

    session.apply(DashboardEvent::SelectX("day".into()));
    session.apply(DashboardEvent::SelectY("total_bill".into()));
    session.apply(DashboardEvent::SelectGroup(Some("sex".into())));
    assert!(session.upload().unwrap().plot().is_none());

    session.apply(DashboardEvent::BuildChart);
    match session.upload().unwrap().plot() {
        Some(PlotOutcome::Ready(data)) => {
            assert_eq!(data.title, "total_bill vs day grouped by sex");
            assert_eq!(data.categories, vec!["Sun", "Sat"]);
            assert_eq!(data.groups, vec!["Female", "Male"]);
        }
        other => panic!("expected a chart, got {other:?}"),
    }

    session.apply(DashboardEvent::ExportUploadChart);
    let exported = session.upload_export().unwrap().as_ref().unwrap();
    assert_eq!(exported.file_name().unwrap(), "total_bill_vs_day.png");
    assert!(exported.exists());
}

#[test]
fn build_with_categorical_y_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    session.apply(DashboardEvent::UploadBytes {
        name: "t.csv".into(),
        bytes: b"day,sex\nSun,Female\n".to_vec(),
    });
    session.apply(DashboardEvent::SelectY("sex".into()));
    session.apply(DashboardEvent::BuildChart);
    match session.upload().unwrap().plot() {
        Some(PlotOutcome::Failed(message)) => assert!(message.starts_with("An error occurred: ")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn missing_upload_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    session.apply(DashboardEvent::Upload(dir.path().join("missing.csv")));
    assert!(session.upload().is_none());
    assert!(session.upload_error().unwrap().contains("missing.csv"));
}

#[test]
fn good_upload_clears_previous_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    session.apply(DashboardEvent::Upload(dir.path().join("missing.csv")));

    let path = dir.path().join("ok.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(b"a,b\n1,2\n").unwrap();
    session.apply(DashboardEvent::Upload(path));

    assert!(session.upload_error().is_none());
    assert_eq!(session.upload().unwrap().table().name(), "ok.csv");
}

#[test]
fn tips_toggle_renders_and_exports() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_in(dir.path());
    assert!(session.tips().is_none());

    assert_eq!(session.apply(DashboardEvent::ToggleTips), Recomputed::Tips);
    match session.tips() {
        Some(TipsOutcome::Ready(report)) => {
            assert_eq!(report.preview.row_count(), 6);
            assert_eq!(report.chart.categories, vec!["Sun", "Sat", "Thur"]);
            assert_eq!(report.chart.groups, vec!["Female", "Male"]);
            assert_eq!(report.export, dir.path().join(TIPS_EXPORT_NAME));
            assert!(report.export.exists());
        }
        other => panic!("expected tips report, got {other:?}"),
    }

    session.apply(DashboardEvent::ToggleTips);
    assert!(!session.tips_enabled());
    assert!(session.tips().is_none());
}

#[test]
fn unreadable_tips_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        tips_source: TipsSource::File(dir.path().join("nope.csv")),
        export_dir: dir.path().to_path_buf(),
        ..DashboardConfig::default()
    };
    let mut session = Session::new(config, Arc::new(NoMarket));
    session.apply(DashboardEvent::ToggleTips);
    assert!(matches!(session.tips(), Some(TipsOutcome::Failed(_))));
}
