//! Application state: single-owner, main-thread only.
//!
//! The dashboard session lives here; every user action goes through
//! [`AppState::dispatch`] so the status bar reflects its outcome.

use quotedeck_core::flow::{MarketOutcome, PlotOutcome, ProfileOutcome, TipsOutcome, EMPTY_WARNING};
use quotedeck_core::{DashboardEvent, Recomputed, Session};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Market,
    Datasets,
    Help,
}

impl Panel {
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        match self {
            Panel::Market => 0,
            Panel::Datasets => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Market),
            1 => Some(Panel::Datasets),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Market => "Market",
            Panel::Datasets => "Datasets",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Market)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Market)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Text field being edited in the prompt overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Start,
    End,
    UploadPath,
}

impl EditField {
    pub fn label(self) -> &'static str {
        match self {
            EditField::Start => "Start date (YYYY-MM-DD)",
            EditField::End => "End date (YYYY-MM-DD)",
            EditField::UploadPath => "CSV file to upload",
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Prompt(EditField),
}

/// Upload selector that `h`/`l` cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    X,
    Y,
    Group,
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,
    pub session: Session,
    pub overlay: Overlay,
    pub input: String,
    pub selector: Selector,
    pub status_message: Option<(String, StatusLevel)>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            active_panel: Panel::Market,
            running: true,
            session,
            overlay: Overlay::Welcome,
            input: String::new(),
            selector: Selector::X,
            status_message: None,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    /// Open the prompt overlay for a field, prefilled with its current value.
    pub fn open_prompt(&mut self, field: EditField) {
        self.input = match field {
            EditField::Start => self.session.range().start.to_string(),
            EditField::End => self.session.range().end.to_string(),
            EditField::UploadPath => String::new(),
        };
        self.overlay = Overlay::Prompt(field);
    }

    /// Apply an event to the session and report what happened.
    pub fn dispatch(&mut self, event: DashboardEvent) {
        match self.session.apply(event) {
            Recomputed::Market => self.report_market(),
            Recomputed::Tips => self.report_tips(),
            Recomputed::Upload => self.report_upload(),
            Recomputed::Nothing => {}
        }
    }

    /// Run the first market query.
    pub fn start(&mut self) {
        self.session.start();
        self.report_market();
    }

    /// Cycle the focused upload selector by `delta`, wrapping.
    pub fn cycle_selector(&mut self, delta: isize) {
        let Some(upload) = self.session.upload() else {
            self.set_warning("Upload a CSV file first (press u)");
            return;
        };
        let event = match self.selector {
            Selector::X => {
                let options = upload.x_options();
                let next = wrap(upload.x, delta, options.len());
                options.get(next).cloned().map(DashboardEvent::SelectX)
            }
            Selector::Y => {
                let options = upload.x_options();
                let next = wrap(upload.y, delta, options.len());
                options.get(next).cloned().map(DashboardEvent::SelectY)
            }
            Selector::Group => {
                let options = upload.group_options();
                let next = wrap(upload.group, delta, options.len());
                options.get(next).cloned().map(DashboardEvent::SelectGroup)
            }
        };
        if let Some(event) = event {
            self.dispatch(event);
        }
    }

    fn report_market(&mut self) {
        match self.session.market() {
            Some(MarketOutcome::Ready(report)) => {
                let msg = format!(
                    "{} rows for {} ({})",
                    report.series.len(),
                    report.query.symbol,
                    report.query.interval.label()
                );
                if let ProfileOutcome::Failed(err) = &report.profile {
                    let err = err.clone();
                    self.set_warning(format!("{msg}; {err}"));
                } else {
                    self.set_status(msg);
                }
            }
            Some(MarketOutcome::Empty { .. }) => self.set_warning(EMPTY_WARNING),
            Some(MarketOutcome::Failed { message, .. }) => {
                let message = message.clone();
                self.set_error(message);
            }
            None => {}
        }
    }

    fn report_tips(&mut self) {
        match self.session.tips() {
            Some(TipsOutcome::Ready(report)) => {
                let msg = format!("Saved {}", report.export.display());
                self.set_status(msg);
            }
            Some(TipsOutcome::Failed(message)) => {
                let message = message.clone();
                self.set_error(message);
            }
            None => self.set_status("Tips chart hidden"),
        }
    }

    fn report_upload(&mut self) {
        if let Some(err) = self.session.upload_error() {
            let err = err.to_string();
            self.set_error(err);
            return;
        }
        if let Some(export) = self.session.upload_export() {
            match export {
                Ok(path) => {
                    let msg = format!("Saved {}", path.display());
                    self.set_status(msg);
                }
                Err(message) => {
                    let message = message.clone();
                    self.set_error(message);
                }
            }
            return;
        }
        let Some(upload) = self.session.upload() else {
            return;
        };
        let msg = match upload.plot() {
            Some(PlotOutcome::Ready(data)) => Ok(format!("Built \"{}\"", data.title)),
            Some(PlotOutcome::Failed(message)) => Err(message.clone()),
            None => Ok(format!(
                "Loaded {} ({} rows, {} columns)",
                upload.table().name(),
                upload.table().height(),
                upload.table().width()
            )),
        };
        match msg {
            Ok(msg) => self.set_status(msg),
            Err(msg) => self.set_error(msg),
        }
    }
}

fn wrap(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).rem_euclid(len as isize) as usize
}
