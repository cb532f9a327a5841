//! Market panel: close-price chart, recent rows, statistics, metric tiles.

use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use quotedeck_core::chart::LineChartData;
use quotedeck_core::flow::{MarketOutcome, MarketReport, ProfileOutcome, EMPTY_WARNING, PREVIEW_ROWS};
use quotedeck_core::format::ProfileView;

use crate::app::AppState;
use crate::theme;
use crate::ui::widgets::{text_table, titled_block};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);

    render_header(f, chunks[0], app);

    match app.session.market() {
        Some(MarketOutcome::Ready(report)) => render_report(f, chunks[1], report),
        Some(MarketOutcome::Empty { .. }) => render_message(f, chunks[1], EMPTY_WARNING, theme::warning()),
        Some(MarketOutcome::Failed { message, .. }) => {
            render_message(f, chunks[1], message, theme::negative())
        }
        None => render_message(f, chunks[1], "Loading…", theme::muted()),
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let range = app.session.range();
    let mut spans = vec![
        Span::styled(app.session.config().symbol.clone(), theme::accent_bold()),
        Span::styled("  from ", theme::muted()),
        Span::styled(range.start.to_string(), theme::accent()),
        Span::styled(" to ", theme::muted()),
        Span::styled(range.end.to_string(), theme::accent()),
        Span::styled("  interval ", theme::muted()),
        Span::styled(app.session.interval().label(), theme::accent()),
    ];
    if range.is_inverted() {
        spans.push(Span::styled("  (start after end)", theme::warning()));
    }
    let hints = Line::from(Span::styled(
        "[s]tart [e]nd [ ] { } shift  [h/l] interval  [r]efresh",
        theme::muted(),
    ));
    f.render_widget(Paragraph::new(vec![Line::from(spans), hints]), area);
}

fn render_message(f: &mut Frame, area: Rect, message: &str, style: Style) {
    let para = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(message, style))])
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

fn render_report(f: &mut Frame, area: Rect, report: &MarketReport) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(area);

    match &report.profile {
        ProfileOutcome::Ready(view) => render_tiles(f, rows[0], view),
        ProfileOutcome::Failed(message) => {
            let para = Paragraph::new(Span::styled(message.as_str(), theme::negative()))
                .block(titled_block("Company"));
            f.render_widget(para, rows[0]);
        }
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_close_chart(f, cols[0], &report.chart);

    let tables = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_ROWS as u16 + 3),
            Constraint::Min(11),
        ])
        .split(cols[1]);
    f.render_widget(text_table(&report.preview, "Recent rows"), tables[0]);
    f.render_widget(text_table(&report.stats_table, "Statistics"), tables[1]);
}

fn render_tiles(f: &mut Frame, area: Rect, view: &ProfileView) {
    let tiles = view.tiles();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);
    for ((label, value), cell) in tiles.iter().zip(cells.iter()) {
        let para = Paragraph::new(Span::styled(*value, theme::positive())).block(titled_block(label));
        f.render_widget(para, *cell);
    }
}

fn day_number(date: &NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn render_close_chart(f: &mut Frame, area: Rect, chart: &LineChartData) {
    let Some((min_y, max_y)) = chart.value_bounds() else {
        render_message(f, area, "No closing prices to plot.", theme::muted());
        return;
    };

    let data: Vec<(f64, f64)> = chart.points.iter().map(|(d, v)| (day_number(d), *v)).collect();
    let first = data.first().map(|p| p.0).unwrap_or(0.0);
    let last = data.last().map(|p| p.0).unwrap_or(first);
    let x_max = if last > first { last } else { first + 1.0 };

    let padding = ((max_y - min_y).abs() * 0.05).max(0.5);
    let y_min = min_y - padding;
    let y_max = max_y + padding;

    let first_label = chart.points.first().map(|p| p.0.to_string()).unwrap_or_default();
    let last_label = chart.points.last().map(|p| p.0.to_string()).unwrap_or_default();

    let dataset = Dataset::default()
        .name("Close")
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(theme::ACCENT))
        .graph_type(GraphType::Line)
        .data(&data);

    let widget = Chart::new(vec![dataset])
        .block(titled_block(&chart.title))
        .x_axis(
            Axis::default()
                .title(Span::styled("Date", theme::muted()))
                .style(theme::muted())
                .bounds([first, x_max])
                .labels(vec![
                    Span::styled(first_label, theme::muted()),
                    Span::styled(last_label, theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Close", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{:.2}", y_min), theme::muted()),
                    Span::styled(format!("{:.2}", y_max), theme::muted()),
                ]),
        );

    f.render_widget(widget, area);
}
