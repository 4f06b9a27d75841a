//! Common styling utilities for TUI components

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders};
use sweepscope_core::{Role, format::AxisLabel};

/// Standard color for focused panels
pub const FOCUS_COLOR: Color = Color::Yellow;

/// Standard color for help text
pub const HELP_COLOR: Color = Color::DarkGray;

/// Standard color for headers
pub const HEADER_COLOR: Color = Color::Cyan;

/// Standard color for error messages
pub const ERROR_COLOR: Color = Color::Red;

/// Line colors for overlaid series, cycled in selection order
pub const SERIES_COLORS: [Color; 6] = [
    Color::Green,
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Blue,
    Color::Red,
];

/// Heatmap glyphs from low to high
pub const HEAT_CHARS: [char; 7] = [' ', '.', ':', '+', '*', '#', '@'];

/// Block whose border turns yellow when focused, with help text along the
/// bottom border while focused.
pub fn focused_block_with_help(title: &str, focused: bool, help_text: &str) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(FOCUS_COLOR)
    } else {
        Style::default()
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string());

    if focused && !help_text.is_empty() {
        block = block.title_bottom(Line::from(format!(" {help_text} ")).fg(HELP_COLOR));
    }

    block
}

pub fn series_color(index: usize) -> Color {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

pub fn role_color(role: Option<Role>) -> Color {
    match role {
        Some(Role::XAxis) => Color::Green,
        Some(Role::YAxis) => Color::Magenta,
        Some(Role::FixedIndex) => Color::Cyan,
        Some(Role::Average) => Color::DarkGray,
        None => Color::Red,
    }
}

/// Glyph and color for a heatmap cell normalized to `0.0..=1.0`; NaN is blank
pub fn heat_cell(normalized: f64) -> (char, Color) {
    if normalized.is_nan() {
        return (' ', Color::Reset);
    }
    let normalized = normalized.clamp(0.0, 1.0);
    let index = (normalized * (HEAT_CHARS.len() - 1) as f64).round() as usize;
    let color = if normalized < 0.33 {
        Color::Red
    } else if normalized < 0.66 {
        Color::Yellow
    } else {
        Color::Green
    };
    (HEAT_CHARS[index.min(HEAT_CHARS.len() - 1)], color)
}

/// Axis title with the last name segment in bold
pub fn axis_title(label: &AxisLabel) -> Line<'static> {
    let mut spans = Vec::with_capacity(3);
    if !label.prefix.is_empty() {
        spans.push(Span::raw(format!("{}.", label.prefix)).fg(HELP_COLOR));
    }
    spans.push(Span::styled(
        label.emphasized.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    if !label.unit.is_empty() {
        spans.push(Span::raw(format!(" ({})", label.unit)).fg(HELP_COLOR));
    }
    Line::from(spans)
}
