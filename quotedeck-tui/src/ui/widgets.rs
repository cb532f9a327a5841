//! Shared widget builders.

use ratatui::layout::Constraint;
use ratatui::style::Modifier;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Row, Table};

use quotedeck_core::table::TextTable;

use crate::theme;

/// A bordered ratatui table from a pre-formatted text grid.
pub fn text_table<'a>(table: &'a TextTable, title: &'a str) -> Table<'a> {
    let widths: Vec<Constraint> = table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let header = Row::new(table.headers.iter().map(String::as_str))
        .style(theme::accent().add_modifier(Modifier::BOLD));
    let rows = table
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(String::as_str)).style(theme::secondary()));

    Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(titled_block(title))
}

pub fn titled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(Span::styled(title, theme::neutral()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn renders_headers_and_cells() {
        let mut table = TextTable::new(vec!["day".into(), "total_bill".into()]);
        table.rows.push(vec!["Sun".into(), "16.99".into()]);

        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal
            .draw(|f| f.render_widget(text_table(&table, "Preview"), f.area()))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Preview"));
        assert!(text.contains("total_bill"));
        assert!(text.contains("16.99"));
    }
}
