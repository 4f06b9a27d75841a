use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::components::{
    Component, EventResult, coordinates::CoordinatesPanel, plots::PlotsPanel,
    results::ResultsPanel, status_bar::StatusBar,
};
use crate::state::{AppState, Panel};

pub struct App {
    state: AppState,
    coordinates: CoordinatesPanel,
    results: ResultsPanel,
    plots: PlotsPanel,
    status_bar: StatusBar,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            coordinates: CoordinatesPanel::new(),
            results: ResultsPanel::new(),
            plots: PlotsPanel::new(),
            status_bar: StatusBar::new(),
        }
    }

    /// runs the application's main loop until the user quits
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        tracing::info!(run = %self.state.session.dataset().name(), "viewer started");
        while !self.state.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Content
                Constraint::Length(2), // Status bar
            ])
            .split(frame.area());

        self.render_content(frame, chunks[0]);
        self.status_bar.render(frame, chunks[1], &self.state);
    }

    fn render_content(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        self.coordinates.render(frame, left[0], &self.state);
        self.results.render(frame, left[1], &self.state);
        self.plots.render(frame, columns[1], &self.state);
    }

    fn handle_events(&mut self) -> io::Result<()> {
        // Wake up when a pending slider value settles even without input
        let ready = match self.state.slider.time_until_settled(Instant::now()) {
            Some(wait) => event::poll(wait.max(Duration::from_millis(1)))?,
            None => true,
        };

        if ready {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    self.handle_key_event(key_event)
                }
                _ => {}
            };
        }

        self.state.settle(Instant::now());
        Ok(())
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') if key_event.modifiers.is_empty() => {
                self.state.exit = true;
                return;
            }
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.exit = true;
                return;
            }
            KeyCode::Tab => {
                self.state.panel = self.state.panel.next();
                return;
            }
            KeyCode::Esc => {
                self.state.clear_message();
                return;
            }
            KeyCode::Char('d') => {
                self.state.dump_roles();
                return;
            }
            KeyCode::Char('i') => {
                self.state.toggle_summary();
                return;
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.state.change_columns(1);
                return;
            }
            KeyCode::Char('-') => {
                self.state.change_columns(-1);
                return;
            }
            _ => {}
        }

        let result = match self.state.panel {
            Panel::Coordinates => self.coordinates.handle_key(key_event, &mut self.state),
            Panel::Results => self.results.handle_key(key_event, &mut self.state),
            Panel::Plots => self.plots.handle_key(key_event, &mut self.state),
        };

        if result == EventResult::NotHandled {
            tracing::debug!(key = ?key_event.code, panel = ?self.state.panel, "unhandled key");
        }
    }
}
