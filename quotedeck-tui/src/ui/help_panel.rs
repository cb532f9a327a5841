//! Help panel: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-3", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1: Market");
    key(&mut lines, "s / e", "Edit start / end date");
    key(&mut lines, "[ / ]", "Move start date back / forward 30 days");
    key(&mut lines, "{ / }", "Move end date back / forward 30 days");
    key(&mut lines, "h / l", "Previous / next sampling interval");
    key(&mut lines, "r", "Re-run the current query");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2: Datasets");
    key(&mut lines, "t", "Toggle the tips chart (writes tips_barplot.png)");
    key(&mut lines, "u", "Upload a CSV file by path");
    key(&mut lines, "x / y / g", "Focus the X, Y or group selector");
    key(&mut lines, "j / k", "Move selector focus down / up");
    key(&mut lines, "h / l", "Cycle the focused selector");
    key(&mut lines, "Enter / b", "Build the chart from the selections");
    key(&mut lines, "p", "Export the built chart as <y>_vs_<x>.png");
    lines.push(Line::from(""));

    section(&mut lines, "Prompts");
    key(&mut lines, "Enter", "Submit");
    key(&mut lines, "Esc", "Cancel");

    f.render_widget(Paragraph::new(lines), area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
