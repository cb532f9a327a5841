//! Datasets panel: the tips chart and upload-and-plot.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Paragraph, Wrap};
use ratatui::Frame;

use quotedeck_core::chart::BarChartData;
use quotedeck_core::flow::{PlotOutcome, TipsOutcome, UploadSession, DATASET_PREVIEW_ROWS};
use quotedeck_core::format::fmt2;

use crate::app::{AppState, Selector};
use crate::theme;
use crate::ui::widgets::{text_table, titled_block};

/// Bar heights are integers; means are scaled to keep two decimals.
const BAR_SCALE: f64 = 100.0;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_tips(f, cols[0], app);
    render_upload(f, cols[1], app);
}

fn render_tips(f: &mut Frame, area: Rect, app: &AppState) {
    let block = titled_block(" Tips dataset [t] ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.session.tips() {
        None => lines(f, inner, vec![hint("Hidden. Press t to show the tips chart.")]),
        Some(TipsOutcome::Failed(message)) => lines(f, inner, vec![error(message)]),
        Some(TipsOutcome::Ready(report)) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(DATASET_PREVIEW_ROWS as u16 + 3),
                    Constraint::Min(6),
                    Constraint::Length(1),
                ])
                .split(inner);
            f.render_widget(text_table(&report.preview, "First rows"), rows[0]);
            render_bar_chart(f, rows[1], &report.chart);
            let saved = Line::from(vec![
                Span::styled("Saved ", theme::muted()),
                Span::styled(report.export.display().to_string(), theme::accent()),
            ]);
            f.render_widget(Paragraph::new(saved), rows[2]);
        }
    }
}

fn render_upload(f: &mut Frame, area: Rect, app: &AppState) {
    let block = titled_block(" Upload and plot [u] ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(upload) = app.session.upload() else {
        let mut body = vec![hint("No file uploaded. Press u and enter a CSV path.")];
        if let Some(err) = app.session.upload_error() {
            body.push(Line::from(""));
            body.push(error(err));
        }
        lines(f, inner, body);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(DATASET_PREVIEW_ROWS.min(upload.table().height()) as u16 + 3),
            Constraint::Length(4),
            Constraint::Min(6),
        ])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(upload.table().name().to_string(), theme::accent_bold()),
        Span::styled(
            format!("  {} rows × {} columns", upload.table().height(), upload.table().width()),
            theme::muted(),
        ),
    ]);
    f.render_widget(Paragraph::new(title), rows[0]);
    f.render_widget(text_table(upload.preview(), "First rows"), rows[1]);
    lines(f, rows[2], selector_lines(upload, app.selector));

    match upload.plot() {
        Some(PlotOutcome::Ready(data)) => render_bar_chart(f, rows[3], data),
        Some(PlotOutcome::Failed(message)) => lines(f, rows[3], vec![error(message)]),
        None => lines(f, rows[3], vec![hint("Press Enter to build the chart.")]),
    }
}

fn selector_lines(upload: &UploadSession, focus: Selector) -> Vec<Line<'static>> {
    let columns = upload.x_options();
    let groups = upload.group_options();
    let x = columns.get(upload.x).cloned().unwrap_or_default();
    let y = columns.get(upload.y).cloned().unwrap_or_default();
    let group = groups
        .get(upload.group)
        .cloned()
        .flatten()
        .unwrap_or_else(|| "none".to_string());

    vec![
        selector_line("X", x, focus == Selector::X),
        selector_line("Y", y, focus == Selector::Y),
        selector_line("Group", group, focus == Selector::Group),
        Line::from(Span::styled(
            "[x/y/g] focus  [h/l] change  [Enter] build  [p] export png",
            theme::muted(),
        )),
    ]
}

fn selector_line(label: &'static str, value: String, focused: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:>6}: "), theme::muted()),
        Span::styled(format!(" {value} "), theme::focused(focused)),
    ])
}

fn render_bar_chart(f: &mut Frame, area: Rect, data: &BarChartData) {
    let block = titled_block(&data.title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(inner);

    if data.is_grouped() {
        let mut legend = vec![Span::styled(format!("{}: ", data.y_label), theme::muted())];
        for (g, name) in data.groups.iter().enumerate() {
            legend.push(Span::styled(
                format!("■ {name}  "),
                Style::default().fg(theme::series_color(g)),
            ));
        }
        f.render_widget(Paragraph::new(Line::from(legend)), rows[0]);
    } else {
        let label = Line::from(Span::styled(format!("mean {}", data.y_label), theme::muted()));
        f.render_widget(Paragraph::new(label), rows[0]);
    }

    f.render_widget(bar_chart(data), rows[1]);
}

fn bar_chart(data: &BarChartData) -> BarChart<'_> {
    let mut chart = BarChart::default().bar_width(6).bar_gap(0).group_gap(2);
    for (c, category) in data.categories.iter().enumerate() {
        let bars: Vec<Bar> = data
            .groups
            .iter()
            .enumerate()
            .map(|(g, _)| {
                let value = data.value(g, c);
                Bar::default()
                    .value(value.map(|v| (v * BAR_SCALE).round().max(0.0) as u64).unwrap_or(0))
                    .text_value(value.map(fmt2).unwrap_or_default())
                    .style(Style::default().fg(theme::series_color(g)))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(category.as_str()))
                .bars(&bars),
        );
    }
    chart
}

fn lines(f: &mut Frame, area: Rect, body: Vec<Line>) {
    f.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }), area);
}

fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, theme::muted()))
}

fn error(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, theme::negative()))
}
