//! Coordinates panel: one row per logical dimension with its role, fixed
//! value and sweep group members.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};
use sweepscope_core::format::{format_tick, pretty_name};
use sweepscope_core::{DimId, Role};

use super::{Component, EventResult};
use crate::state::{AppState, Panel};
use crate::util::navigation::{calculate_centered_scroll, handle_list_navigation};
use crate::util::styles::{HELP_COLOR, focused_block_with_help, role_color};

const HELP: &str = "j/k move | a avg | f fixed | x/y axis | h/l index | m member";

pub struct CoordinatesPanel;

impl CoordinatesPanel {
    pub fn new() -> Self {
        Self
    }

    fn row(state: &AppState, id: DimId, selected: bool) -> Option<ListItem<'static>> {
        let dim = state.session.roles().dimension(id)?;
        let group = state.session.grouping().group(id)?;

        let name_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let prefix = if selected { "> " } else { "  " };
        let role = dim.role();

        let mut spans = vec![
            Span::styled(prefix, name_style),
            Span::styled(pretty_name(dim.name()), name_style),
            Span::styled(format!(" [{}]", dim.size()), Style::default().fg(HELP_COLOR)),
            Span::raw("  "),
            Span::styled(
                role.map(Role::label).unwrap_or("unassigned"),
                Style::default().fg(role_color(role)),
            ),
        ];

        if role == Some(Role::FixedIndex) {
            let index = state.display_index(id).unwrap_or(0);
            let coord = state.session.dataset().coord(dim.name());
            let value = coord
                .and_then(|c| c.tick(index).map(|v| format_tick(v, &c.unit)))
                .unwrap_or_default();
            let pending = state.slider.pending(&id).is_some();
            spans.push(Span::styled(
                format!(" {index}: {value}{}", if pending { " …" } else { "" }),
                Style::default().fg(Color::Cyan),
            ));
        }

        if group.is_parallel() {
            let others: Vec<String> = group.inactive_members().map(pretty_name).collect();
            spans.push(Span::styled(
                format!("  ~ {}", others.join(", ")),
                Style::default().fg(HELP_COLOR),
            ));
        }

        Some(ListItem::new(Line::from(spans)))
    }
}

impl Component for CoordinatesPanel {
    fn handle_key(&mut self, key: KeyEvent, state: &mut AppState) -> EventResult {
        let total = state.session.roles().len();
        if handle_list_navigation(&key, &mut state.selected_dim, total) {
            return EventResult::Handled;
        }

        match key.code {
            KeyCode::Char('a') => state.set_role(Role::Average),
            KeyCode::Char('f') => state.set_role(Role::FixedIndex),
            KeyCode::Char('x') => state.set_role(Role::XAxis),
            KeyCode::Char('y') => state.set_role(Role::YAxis),
            KeyCode::Char('h') | KeyCode::Left => state.nudge_fixed_index(-1, Instant::now()),
            KeyCode::Char('l') | KeyCode::Right => state.nudge_fixed_index(1, Instant::now()),
            KeyCode::Char('m') => state.cycle_active_member(),
            _ => return EventResult::NotHandled,
        }
        EventResult::Handled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.panel == Panel::Coordinates;
        let title = format!(" COORDINATES - {} ", state.session.dataset().name());
        let block = focused_block_with_help(&title, focused, HELP);

        let total = state.session.roles().len();
        if total == 0 {
            let paragraph = Paragraph::new("  This run has no axes.").block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let visible = area.height.saturating_sub(2) as usize;
        let offset = calculate_centered_scroll(state.selected_dim, total, visible);
        let items: Vec<ListItem> = (offset..total)
            .take(visible)
            .filter_map(|i| Self::row(state, DimId(i), i == state.selected_dim))
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
