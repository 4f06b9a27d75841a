use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{Component, EventResult};
use crate::state::{AppState, Panel, StatusMessage};
use crate::util::styles::{ERROR_COLOR, HELP_COLOR};

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    fn get_help_text(state: &AppState) -> &'static str {
        match state.panel {
            Panel::Coordinates => {
                "Tab: panel | a/f/x/y: role | h/l: index | m: member | +/-: columns | i: summary | d: dump | q: quit"
            }
            Panel::Results => "Tab: panel | j/k: move | space: plot | +/-: columns | i: summary | q: quit",
            Panel::Plots => "Tab: panel | +/-: columns | i: summary | d: dump | q: quit",
        }
    }
}

impl Component for StatusBar {
    fn handle_key(&mut self, _key: KeyEvent, _state: &mut AppState) -> EventResult {
        EventResult::NotHandled
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let content = match (&state.message, state.current_notice()) {
            (Some(StatusMessage::Error(error)), _) => Line::from(vec![
                Span::styled("Error: ", Style::default().fg(ERROR_COLOR)),
                Span::raw(error.as_str()),
            ]),
            (Some(StatusMessage::Info(info)), _) => Line::from(Span::raw(info.as_str())),
            (None, Some(notice)) => Line::from(vec![
                Span::styled("Note: ", Style::default().fg(Color::Yellow)),
                Span::raw(notice.to_string()),
            ]),
            (None, None) => Line::from(Span::styled(
                Self::get_help_text(state),
                Style::default().fg(HELP_COLOR),
            )),
        };

        let paragraph = Paragraph::new(content).block(Block::default().borders(Borders::TOP));
        frame.render_widget(paragraph, area);
    }
}
