//! Keyboard input dispatch: overlays, then global keys, then panel keys.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use quotedeck_core::domain::parse_date;
use quotedeck_core::DashboardEvent;

use crate::app::{AppState, EditField, Overlay, Panel, Selector};

/// Days moved per `[`/`]`/`{`/`}` press.
const DATE_STEP_DAYS: i64 = 30;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Welcome => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::Prompt(field) => {
            handle_prompt(app, field, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Market; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Datasets; return; }
        KeyCode::Char('3') | KeyCode::Char('?') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            app.active_panel = app.active_panel.next();
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        _ => {}
    }

    // 3. Panel-specific keys.
    match app.active_panel {
        Panel::Market => handle_market_key(app, key),
        Panel::Datasets => handle_datasets_key(app, key),
        Panel::Help => {}
    }
}

fn handle_prompt(app: &mut AppState, field: EditField, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.overlay = Overlay::None;
            app.input.clear();
        }
        KeyCode::Enter => {
            let value = std::mem::take(&mut app.input);
            app.overlay = Overlay::None;
            submit_prompt(app, field, value.trim());
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(c) => {
            app.input.push(c);
        }
        _ => {}
    }
}

fn submit_prompt(app: &mut AppState, field: EditField, value: &str) {
    match field {
        EditField::Start | EditField::End => match parse_date(value) {
            Ok(date) if field == EditField::Start => app.dispatch(DashboardEvent::SetStart(date)),
            Ok(date) => app.dispatch(DashboardEvent::SetEnd(date)),
            Err(e) => app.set_error(e.to_string()),
        },
        EditField::UploadPath => {
            if value.is_empty() {
                app.set_warning("No file given");
            } else {
                app.dispatch(DashboardEvent::Upload(PathBuf::from(value)));
            }
        }
    }
}

fn handle_market_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('s') => app.open_prompt(EditField::Start),
        KeyCode::Char('e') => app.open_prompt(EditField::End),
        KeyCode::Char('[') => app.dispatch(DashboardEvent::ShiftStart(-DATE_STEP_DAYS)),
        KeyCode::Char(']') => app.dispatch(DashboardEvent::ShiftStart(DATE_STEP_DAYS)),
        KeyCode::Char('{') => app.dispatch(DashboardEvent::ShiftEnd(-DATE_STEP_DAYS)),
        KeyCode::Char('}') => app.dispatch(DashboardEvent::ShiftEnd(DATE_STEP_DAYS)),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('i') => {
            let next = app.session.interval().next();
            app.dispatch(DashboardEvent::SetInterval(next));
        }
        KeyCode::Char('h') | KeyCode::Left => {
            let prev = app.session.interval().prev();
            app.dispatch(DashboardEvent::SetInterval(prev));
        }
        KeyCode::Char('r') => app.dispatch(DashboardEvent::Refresh),
        _ => {}
    }
}

fn handle_datasets_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') => app.dispatch(DashboardEvent::ToggleTips),
        KeyCode::Char('u') => app.open_prompt(EditField::UploadPath),
        KeyCode::Char('x') => app.selector = Selector::X,
        KeyCode::Char('y') => app.selector = Selector::Y,
        KeyCode::Char('g') => app.selector = Selector::Group,
        KeyCode::Char('j') | KeyCode::Down => {
            app.selector = match app.selector {
                Selector::X => Selector::Y,
                Selector::Y => Selector::Group,
                Selector::Group => Selector::X,
            };
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selector = match app.selector {
                Selector::X => Selector::Group,
                Selector::Y => Selector::X,
                Selector::Group => Selector::Y,
            };
        }
        KeyCode::Char('l') | KeyCode::Right => app.cycle_selector(1),
        KeyCode::Char('h') | KeyCode::Left => app.cycle_selector(-1),
        KeyCode::Enter | KeyCode::Char('b') => {
            if app.session.upload().is_some() {
                app.dispatch(DashboardEvent::BuildChart);
            } else {
                app.set_warning("Upload a CSV file first (press u)");
            }
        }
        KeyCode::Char('p') => app.dispatch(DashboardEvent::ExportUploadChart),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::StatusLevel;
    use crate::test_helpers::{app_with_upload, test_app};
    use chrono::NaiveDate;
    use crossterm::event::KeyEventState;
    use quotedeck_core::domain::SamplingInterval;
    use quotedeck_core::flow::PlotOutcome;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn welcome_dismissed_by_any_key() {
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
        handle_key(&mut app, press(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[test]
    fn number_keys_switch_panels() {
        let mut app = test_app();
        app.overlay = Overlay::None;
        handle_key(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.active_panel, Panel::Datasets);
        handle_key(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_panel, Panel::Help);
    }

    #[test]
    fn editing_end_date_reruns_market() {
        let mut app = test_app();
        app.overlay = Overlay::None;
        handle_key(&mut app, press(KeyCode::Char('e')));
        for _ in 0..10 {
            handle_key(&mut app, press(KeyCode::Backspace));
        }
        type_str(&mut app, "2020-04-01");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.session.range().end, NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
        assert!(app.session.market().is_some());
    }

    #[test]
    fn bad_date_is_reported() {
        let mut app = test_app();
        app.overlay = Overlay::None;
        handle_key(&mut app, press(KeyCode::Char('s')));
        type_str(&mut app, "x");
        handle_key(&mut app, press(KeyCode::Enter));
        assert_eq!(app.status_message.unwrap().1, StatusLevel::Error);
        assert_eq!(app.session.range().start, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn interval_keys_cycle() {
        let mut app = test_app();
        app.overlay = Overlay::None;
        assert_eq!(app.session.interval(), SamplingInterval::Monthly);
        handle_key(&mut app, press(KeyCode::Char('h')));
        assert_eq!(app.session.interval(), SamplingInterval::Weekly);
    }

    #[test]
    fn build_key_plots_upload() {
        let (mut app, _dir) = app_with_upload("day,total_bill\nSun,10\nSat,20\n");
        app.overlay = Overlay::None;
        app.active_panel = Panel::Datasets;
        handle_key(&mut app, press(KeyCode::Char('y')));
        handle_key(&mut app, press(KeyCode::Char('l')));
        assert!(app.session.upload().unwrap().plot().is_none());
        handle_key(&mut app, press(KeyCode::Enter));
        match app.session.upload().unwrap().plot() {
            Some(PlotOutcome::Ready(data)) => assert_eq!(data.title, "total_bill vs day"),
            other => panic!("expected chart, got {other:?}"),
        }
    }
}
