use std::time::Instant;

use sweepscope_core::debounce::Debouncer;
use sweepscope_core::{DimId, Notice, Rendered, Role, RunSession, SessionError};

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Coordinates,
    Results,
    Plots,
}

impl Panel {
    pub fn next(self) -> Panel {
        match self {
            Panel::Coordinates => Panel::Results,
            Panel::Results => Panel::Plots,
            Panel::Plots => Panel::Coordinates,
        }
    }
}

/// Latest message for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Info(String),
    Error(String),
}

pub struct AppState {
    pub session: RunSession,
    pub config: AppConfig,
    pub panel: Panel,
    pub selected_dim: usize,
    pub selected_result: usize,
    /// Fixed-index changes waiting for the slider to settle
    pub slider: Debouncer<DimId, usize>,
    pub rendered: Option<Rendered>,
    pub startup_notices: Vec<Notice>,
    pub message: Option<StatusMessage>,
    /// Plot pane shows the run summary instead of the charts
    pub show_summary: bool,
    pub exit: bool,
}

impl AppState {
    pub fn new(session: RunSession, config: AppConfig) -> Self {
        let startup_notices = session.startup_notices();
        let mut state = Self {
            slider: Debouncer::new(config.slider_debounce()),
            session,
            config,
            panel: Panel::default(),
            selected_dim: 0,
            selected_result: 0,
            rendered: None,
            startup_notices,
            message: None,
            show_summary: false,
            exit: false,
        };
        state.refresh();
        state
    }

    /// Re-run reduction and composition for the current session state
    pub fn refresh(&mut self) {
        match self.session.render() {
            Ok(rendered) => self.rendered = Some(rendered),
            Err(err) => {
                tracing::error!(%err, "render failed");
                self.set_error(err.to_string());
            }
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = Some(StatusMessage::Error(message.into()));
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.message = Some(StatusMessage::Info(message.into()));
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Notice explaining why plots are missing or incomplete, if any
    pub fn current_notice(&self) -> Option<&Notice> {
        self.rendered
            .as_ref()
            .and_then(|r| r.notices.first())
            .or_else(|| self.startup_notices.first())
    }

    /// Apply the outcome of an operator action: re-render on success,
    /// surface the error otherwise.
    pub fn apply<T>(&mut self, result: Result<T, SessionError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.clear_message();
                self.refresh();
                Some(value)
            }
            Err(err) => {
                self.set_error(err.to_string());
                None
            }
        }
    }

    pub fn selected_dim_id(&self) -> DimId {
        DimId(self.selected_dim)
    }

    /// Index shown for a dimension: the unsettled slider value if any, else the recorded one
    pub fn display_index(&self, id: DimId) -> Option<usize> {
        self.slider
            .pending(&id)
            .copied()
            .or_else(|| self.session.roles().dimension(id).and_then(|d| d.fixed_index()))
    }

    pub fn set_role(&mut self, role: Role) {
        let id = self.selected_dim_id();
        let Some(name) = self.session.roles().dimension(id).map(|d| d.name().to_string()) else {
            return;
        };
        let index = self.display_index(id);
        let result = self.session.set_role(&name, role, index);
        self.apply(result);
    }

    /// Move the fixed index of the selected dimension by `delta`; applied once settled
    pub fn nudge_fixed_index(&mut self, delta: isize, now: Instant) {
        let id = self.selected_dim_id();
        let Some(dim) = self.session.roles().dimension(id) else {
            return;
        };
        if dim.role() != Some(Role::FixedIndex) {
            self.set_info("h/l moves the index of a fixed dimension (press f first)");
            return;
        }
        let last = dim.size().saturating_sub(1);
        let current = self.display_index(id).unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        if next != current {
            self.slider.push(id, next, now);
        }
    }

    /// Apply slider values that have settled by `now`
    pub fn settle(&mut self, now: Instant) {
        let settled = self.slider.poll(now);
        if settled.is_empty() {
            return;
        }
        for (id, index) in settled {
            let Some(name) = self.session.roles().dimension(id).map(|d| d.name().to_string()) else {
                continue;
            };
            let result = self.session.set_fixed_index(&name, index);
            self.apply(result);
        }
    }

    /// Switch the selected dimension to the next member of its sweep group
    pub fn cycle_active_member(&mut self) {
        let Some(group) = self.session.grouping().group(self.selected_dim_id()) else {
            return;
        };
        if !group.is_parallel() {
            self.set_info("not a parallel sweep");
            return;
        }
        let members = group.members();
        let position = members
            .iter()
            .position(|m| m == group.active_name())
            .unwrap_or(0);
        let next = members[(position + 1) % members.len()].clone();
        let group_index = group.group_index();

        let result = self.session.set_active_sweep_member(group_index, &next);
        self.apply(result);
    }

    pub fn toggle_selected_result(&mut self) {
        let Some(name) = self
            .session
            .dataset()
            .variable_names()
            .get(self.selected_result)
            .map(|n| n.to_string())
        else {
            return;
        };
        let result = self.session.toggle_variable_selection(&name);
        self.apply(result);
    }

    pub fn change_columns(&mut self, delta: isize) {
        let columns = self
            .session
            .layout()
            .columns_per_row()
            .saturating_add_signed(delta)
            .max(1);
        let result = self.session.set_columns_per_row(columns);
        self.apply(result);
    }

    pub fn toggle_summary(&mut self) {
        self.show_summary = !self.show_summary;
    }

    pub fn dump_roles(&mut self) {
        let description = self.session.describe_roles();
        tracing::info!(roles = %description, "inspect");
        self.set_info(description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use sweepscope_core::DatasetBuilder;

    fn test_state() -> AppState {
        let dataset = DatasetBuilder::new("run 3")
            .axis("flux", "V", vec![0.0, 0.1, 0.2])
            .linspace("freq", "Hz", 4.0e9, 5.0e9, 4)
            .axis("power", "dBm", vec![-30.0, -20.0])
            .variable_fn("signal", &["flux", "freq", "power"], |i| i as f64)
            .build()
            .unwrap();
        let config = AppConfig::default();
        let session = RunSession::with_options(Arc::new(dataset), config.session_options());
        AppState::new(session, config)
    }

    #[test]
    fn test_new_state_renders_default_selection() {
        let state = test_state();
        let rendered = state.rendered.as_ref().unwrap();
        assert!(rendered.grid.is_some());
        assert!(state.message.is_none());
    }

    #[test]
    fn test_slider_applies_after_settling() {
        let mut state = test_state();
        let flux = DimId(0);
        let start = Instant::now();

        state.nudge_fixed_index(1, start);
        state.nudge_fixed_index(1, start);
        assert_eq!(state.display_index(flux), Some(2));
        assert_eq!(state.session.roles().dimension(flux).unwrap().fixed_index(), Some(0));

        state.settle(start);
        assert_eq!(state.session.roles().dimension(flux).unwrap().fixed_index(), Some(0));

        state.settle(start + Duration::from_secs(1));
        assert_eq!(state.session.roles().dimension(flux).unwrap().fixed_index(), Some(2));
        assert!(state.slider.is_idle());
    }

    #[test]
    fn test_slider_stops_at_last_index() {
        let mut state = test_state();
        let start = Instant::now();
        for _ in 0..5 {
            state.nudge_fixed_index(1, start);
        }
        assert_eq!(state.display_index(DimId(0)), Some(2));
    }

    #[test]
    fn test_nudge_ignores_plot_axes() {
        let mut state = test_state();
        state.selected_dim = 2;
        state.nudge_fixed_index(1, Instant::now());
        assert!(state.slider.is_idle());
        assert!(matches!(state.message, Some(StatusMessage::Info(_))));
    }

    #[test]
    fn test_set_role_cascades_previous_holder() {
        let mut state = test_state();
        state.set_role(Role::XAxis);

        let roles = state.session.roles();
        assert_eq!(roles.x_axis().unwrap().name(), "flux");
        assert_eq!(roles.dimension(DimId(2)).unwrap().role(), Some(Role::FixedIndex));
    }

    #[test]
    fn test_columns_never_drop_below_one() {
        let mut state = test_state();
        state.change_columns(-5);
        assert_eq!(state.session.layout().columns_per_row(), 1);
        state.change_columns(2);
        assert_eq!(state.session.layout().columns_per_row(), 3);
    }

    #[test]
    fn test_summary_toggles() {
        let mut state = test_state();
        assert!(!state.show_summary);
        state.toggle_summary();
        assert!(state.show_summary);
        state.toggle_summary();
        assert!(!state.show_summary);
    }

    #[test]
    fn test_toggle_deselects_default_variable() {
        let mut state = test_state();
        state.toggle_selected_result();
        assert!(state.session.selection().is_empty());
        assert!(state.rendered.as_ref().unwrap().grid.is_none());
    }
}
