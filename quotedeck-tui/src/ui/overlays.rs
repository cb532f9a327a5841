//! Overlay widgets: welcome and the text prompt.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{AppState, EditField};
use crate::theme;
use crate::ui::centered_rect;

/// First-run welcome overlay.
pub fn render_welcome(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Welcome to QuoteDeck ")
        .title_style(theme::accent_bold());

    let symbol = app.session.config().symbol.as_str();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Getting started:", theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!("  1. Panel 1 shows {symbol} for the chosen dates and interval"),
            theme::muted(),
        )),
        Line::from(Span::styled("  2. Press s / e to edit the dates, h / l for the interval", theme::muted())),
        Line::from(Span::styled("  3. Press 2, then t for the tips chart or u to upload a CSV", theme::muted())),
        Line::from(Span::styled("  4. Press 3 for every key binding", theme::muted())),
        Line::from(""),
        Line::from(Span::styled("Press any key to dismiss...", theme::neutral())),
    ];

    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

/// Single-line text prompt.
pub fn render_prompt(f: &mut Frame, area: Rect, field: EditField, input: &str) {
    let popup = centered_rect(50, 20, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::warning())
        .title(format!(" {} [Enter]ok [Esc]cancel ", field.label()))
        .title_style(theme::warning());

    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::styled(input.to_string(), theme::accent_bold()),
            Span::styled("_", theme::muted()),
        ]),
    ];

    f.render_widget(Paragraph::new(text).block(block), popup);
}
