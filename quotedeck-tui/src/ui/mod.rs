//! Top-level UI layout: three-panel frame with status bar.

pub mod datasets_panel;
pub mod help_panel;
pub mod market_panel;
pub mod overlays;
pub mod status_bar;
pub mod widgets;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    match &app.overlay {
        Overlay::Welcome => overlays::render_welcome(f, main_area, app),
        Overlay::Prompt(field) => overlays::render_prompt(f, main_area, *field, &app.input),
        Overlay::None => {}
    }
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Market => market_panel::render(f, inner, app),
        Panel::Datasets => datasets_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner),
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{app_with_upload, test_app};
    use quotedeck_core::DashboardEvent;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }

    #[test]
    fn market_panel_shows_sections() {
        let mut app = test_app();
        app.overlay = Overlay::None;
        app.start();
        let text = screen(&app);
        assert!(text.contains("AAPL close price"));
        assert!(text.contains("Current price"));
        assert!(text.contains("$77.50"));
        assert!(text.contains("count"));
    }

    #[test]
    fn datasets_panel_shows_upload_preview() {
        let (mut app, _dir) = app_with_upload("day,total_bill,sex\nSun,16.99,Female\nSat,23.68,Male\n");
        app.overlay = Overlay::None;
        app.active_panel = Panel::Datasets;
        app.dispatch(DashboardEvent::SelectY("total_bill".into()));
        app.dispatch(DashboardEvent::SelectGroup(Some("sex".into())));
        app.dispatch(DashboardEvent::BuildChart);
        let text = screen(&app);
        assert!(text.contains("upload.csv"));
        assert!(text.contains("total_bill vs day grouped by sex"));
    }

    #[test]
    fn help_and_welcome_render() {
        let mut app = test_app();
        assert!(screen(&app).contains("Welcome to QuoteDeck"));
        app.overlay = Overlay::None;
        app.active_panel = Panel::Help;
        assert!(screen(&app).contains("Toggle the tips chart"));
    }
}
