//! Color tokens and style helpers for the QuoteDeck TUI.
//!
//! Dark terminal palette:
//! - **Accent**: electric cyan (focus, headings, the close-price line)
//! - **Positive**: neon green (metric values, success)
//! - **Negative**: hot pink (failures)
//! - **Warning**: neon orange (empty results, prompts)
//! - **Neutral**: cool purple (secondary info)
//! - **Muted**: steel blue (hints, axis labels)

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Bar colors per group, cycled.
pub const SERIES: [Color; 4] = [ACCENT, NEGATIVE, POSITIVE, WARNING];

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Highlight for the focused selector in the datasets panel.
pub fn focused(active: bool) -> Style {
    if active {
        accent().add_modifier(Modifier::REVERSED)
    } else {
        neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), ACCENT);
        assert_eq!(series_color(4), ACCENT);
        assert_eq!(series_color(1), NEGATIVE);
    }

    #[test]
    fn active_panel_is_highlighted() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(MUTED));
        assert!(focused(true).add_modifier.contains(Modifier::REVERSED));
    }
}
