//! Session state and its update function.
//!
//! Front ends translate input into [`DashboardEvent`]s and hand them to
//! [`Session::apply`], which recomputes only the flow the event touches.
//! Everything runs on the caller's thread.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::DashboardConfig;
use crate::data::{MarketDataProvider, MarketQuery};
use crate::domain::{DateRange, SamplingInterval};
use crate::flow::{
    failure_message, MarketFlow, MarketOutcome, PlotOutcome, TipsFlow, TipsOutcome, UploadSession,
};
use crate::table::UploadedTable;

/// One user action.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    SetStart(NaiveDate),
    SetEnd(NaiveDate),
    /// Move the start date by a number of days.
    ShiftStart(i64),
    ShiftEnd(i64),
    SetInterval(SamplingInterval),
    /// Re-run the market flow with unchanged inputs.
    Refresh,
    ToggleTips,
    Upload(PathBuf),
    UploadBytes { name: String, bytes: Vec<u8> },
    SelectX(String),
    SelectY(String),
    SelectGroup(Option<String>),
    BuildChart,
    ExportUploadChart,
}

/// Which section an applied event recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recomputed {
    Market,
    Tips,
    Upload,
    /// Selection changed; nothing redrawn until the build trigger.
    Nothing,
}

/// Per-user dashboard state. Owns its cache and uploaded table.
pub struct Session {
    config: DashboardConfig,
    range: DateRange,
    interval: SamplingInterval,
    market: MarketFlow,
    market_outcome: Option<MarketOutcome>,
    tips: TipsFlow,
    tips_enabled: bool,
    tips_outcome: Option<TipsOutcome>,
    upload: Option<UploadSession>,
    upload_error: Option<String>,
    upload_export: Option<Result<PathBuf, String>>,
}

impl Session {
    /// Start date from config, end date today.
    pub fn new(config: DashboardConfig, provider: Arc<dyn MarketDataProvider>) -> Self {
        let today = chrono::Local::now().date_naive();
        let range = DateRange::new(config.default_start, today);
        Self::with_range(config, provider, range)
    }

    pub fn with_range(
        config: DashboardConfig,
        provider: Arc<dyn MarketDataProvider>,
        range: DateRange,
    ) -> Self {
        let market = MarketFlow::new(provider, config.cache_capacity, config.cache_ttl());
        let tips = TipsFlow::new(config.tips_source.clone(), config.export_dir.clone());
        Self {
            interval: config.default_interval,
            range,
            market,
            market_outcome: None,
            tips,
            tips_enabled: false,
            tips_outcome: None,
            upload: None,
            upload_error: None,
            upload_export: None,
            config,
        }
    }

    /// Run the market flow for the initial inputs.
    pub fn start(&mut self) {
        self.run_market();
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn interval(&self) -> SamplingInterval {
        self.interval
    }

    pub fn query(&self) -> MarketQuery {
        MarketQuery::new(self.config.symbol.clone(), self.range, self.interval)
    }

    pub fn market(&self) -> Option<&MarketOutcome> {
        self.market_outcome.as_ref()
    }

    pub fn market_flow(&self) -> &MarketFlow {
        &self.market
    }

    pub fn tips_enabled(&self) -> bool {
        self.tips_enabled
    }

    /// Present only while the toggle is on.
    pub fn tips(&self) -> Option<&TipsOutcome> {
        if self.tips_enabled {
            self.tips_outcome.as_ref()
        } else {
            None
        }
    }

    pub fn upload(&self) -> Option<&UploadSession> {
        self.upload.as_ref()
    }

    pub fn upload_mut(&mut self) -> Option<&mut UploadSession> {
        self.upload.as_mut()
    }

    /// Last upload parse failure, cleared by a successful upload.
    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn upload_export(&self) -> Option<&Result<PathBuf, String>> {
        self.upload_export.as_ref()
    }

    /// Apply one event and recompute what it affects.
    pub fn apply(&mut self, event: DashboardEvent) -> Recomputed {
        tracing::debug!(?event, "apply");
        match event {
            DashboardEvent::SetStart(date) => {
                self.range.start = date;
                self.run_market()
            }
            DashboardEvent::SetEnd(date) => {
                self.range.end = date;
                self.run_market()
            }
            DashboardEvent::ShiftStart(days) => {
                self.range.shift_start(days);
                self.run_market()
            }
            DashboardEvent::ShiftEnd(days) => {
                self.range.shift_end(days);
                self.run_market()
            }
            DashboardEvent::SetInterval(interval) => {
                self.interval = interval;
                self.run_market()
            }
            DashboardEvent::Refresh => self.run_market(),
            DashboardEvent::ToggleTips => {
                self.tips_enabled = !self.tips_enabled;
                if self.tips_enabled {
                    self.tips_outcome = Some(self.tips.run());
                }
                Recomputed::Tips
            }
            DashboardEvent::Upload(path) => {
                let name = path.display().to_string();
                self.set_upload(&name, UploadSession::open(&path))
            }
            DashboardEvent::UploadBytes { name, bytes } => {
                let session = UploadedTable::from_bytes(name.clone(), bytes)
                    .map_err(|e| failure_message(&e))
                    .and_then(UploadSession::new);
                self.set_upload(&name, session)
            }
            DashboardEvent::SelectX(column) => {
                if let Some(upload) = self.upload.as_mut() {
                    upload.select_x(&column);
                }
                Recomputed::Nothing
            }
            DashboardEvent::SelectY(column) => {
                if let Some(upload) = self.upload.as_mut() {
                    upload.select_y(&column);
                }
                Recomputed::Nothing
            }
            DashboardEvent::SelectGroup(column) => {
                if let Some(upload) = self.upload.as_mut() {
                    upload.select_group(column.as_deref());
                }
                Recomputed::Nothing
            }
            DashboardEvent::BuildChart => match self.upload.as_mut() {
                Some(upload) => {
                    if let PlotOutcome::Ready(data) = upload.build() {
                        tracing::info!(title = %data.title, "built upload chart");
                    }
                    Recomputed::Upload
                }
                None => Recomputed::Nothing,
            },
            DashboardEvent::ExportUploadChart => match self.upload.as_ref() {
                Some(upload) => {
                    self.upload_export = Some(upload.export(&self.config.export_dir));
                    Recomputed::Upload
                }
                None => Recomputed::Nothing,
            },
        }
    }

    fn run_market(&mut self) -> Recomputed {
        self.market_outcome = Some(self.market.run(self.query()));
        Recomputed::Market
    }

    fn set_upload(&mut self, name: &str, session: Result<UploadSession, String>) -> Recomputed {
        self.upload_export = None;
        match session {
            Ok(session) => {
                tracing::info!(
                    file = name,
                    rows = session.table().height(),
                    columns = session.table().width(),
                    "uploaded table"
                );
                self.upload = Some(session);
                self.upload_error = None;
            }
            Err(message) => {
                tracing::warn!(file = name, %message, "upload rejected");
                self.upload = None;
                self.upload_error = Some(message);
            }
        }
        Recomputed::Upload
    }
}
