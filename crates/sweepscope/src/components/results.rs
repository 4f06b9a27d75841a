use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};
use sweepscope_core::format::pretty_name;

use super::{Component, EventResult};
use crate::state::{AppState, Panel};
use crate::util::navigation::{calculate_centered_scroll, handle_list_navigation};
use crate::util::styles::{HELP_COLOR, focused_block_with_help};

/// Result variables with a checkbox each; checked ones are plotted in selection order
pub struct ResultsPanel;

impl ResultsPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Component for ResultsPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> EventResult {
        let total = state.session.dataset().variable_names().len();
        if handle_list_navigation(&key, &mut state.selected_result, total) {
            return EventResult::Handled;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                state.toggle_selected_result();
                EventResult::Handled
            }
            _ => EventResult::NotHandled,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.panel == Panel::Results;
        let block = focused_block_with_help(" RESULTS ", focused, "j/k move | space toggle");

        let names = state.session.dataset().variable_names();
        if names.is_empty() {
            frame.render_widget(Paragraph::new("  No result variables.").block(block), area);
            return;
        }

        let selection = state.session.selection();
        let visible = area.height.saturating_sub(2) as usize;
        let offset = calculate_centered_scroll(state.selected_result, names.len(), visible);

        let items: Vec<ListItem> = names
            .iter()
            .enumerate()
            .skip(offset)
            .take(visible)
            .map(|(idx, name)| {
                let is_selected = idx == state.selected_result;
                let style = if is_selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let order = selection.names().iter().position(|n| n.as_str() == *name);
                let checkbox = match order {
                    Some(_) => "[x] ",
                    None => "[ ] ",
                };
                let mut spans = vec![
                    Span::styled(if is_selected { "> " } else { "  " }, style),
                    Span::styled(checkbox, style),
                    Span::styled(pretty_name(name), style),
                ];
                if let Some(order) = order {
                    spans.push(Span::styled(format!("  #{}", order + 1), Style::default().fg(HELP_COLOR)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
