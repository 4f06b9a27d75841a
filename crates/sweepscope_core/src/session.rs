//! Per-run session context.
//!
//! [`RunSession`] owns everything one viewer of one run can change: sweep
//! group activity, role assignment, plot selection and layout. It is the only
//! action surface: each operator action validates before mutating, so a
//! rejected action leaves the session exactly as it was. The dataset itself is
//! immutable and can be shared between sessions through its [`Arc`].

use std::sync::Arc;

use serde::Serialize;

use crate::error::SessionError;
use crate::model::{Dataset, DimId, LayoutConfig, PlotSelection, Role};
use crate::notice::Notice;
use crate::plot_grid::{PlotGrid, compose, fixed_values};
use crate::reduction::{ReductionPlan, plot_dims};
use crate::roles::{RoleAssignment, RoleChange};
use crate::sweeps::SweepGrouping;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub layout: LayoutConfig,
    /// Select the first declared variable when the session opens
    pub select_first_variable: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            select_first_variable: true,
        }
    }
}

/// Output of one render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    /// Session revision the pass was computed from
    pub revision: u64,
    pub grid: Option<PlotGrid>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone)]
pub struct RunSession {
    dataset: Arc<Dataset>,
    grouping: SweepGrouping,
    roles: RoleAssignment,
    selection: PlotSelection,
    layout: LayoutConfig,
    revision: u64,
}

impl RunSession {
    pub fn open(dataset: Arc<Dataset>) -> Self {
        Self::with_options(dataset, SessionOptions::default())
    }

    /// Group the axes, apply the default role policy and the initial selection
    pub fn with_options(dataset: Arc<Dataset>, options: SessionOptions) -> Self {
        let grouping = SweepGrouping::from_dataset(&dataset);
        let roles = RoleAssignment::with_defaults(grouping.logical_dimensions(&dataset));

        let mut selection = PlotSelection::new();
        if options.select_first_variable {
            if let Some(first) = dataset.variable_names().first() {
                selection.select(first);
            }
        }

        tracing::info!(
            run = dataset.name(),
            dimensions = roles.len(),
            variables = dataset.variable_names().len(),
            together_sweeps = grouping.together_sweeps(),
            "session opened"
        );

        Self {
            dataset,
            grouping,
            roles,
            selection,
            layout: options.layout,
            revision: 0,
        }
    }

    /// Notices that hold for the whole session (currently only rejected sweep metadata)
    pub fn startup_notices(&self) -> Vec<Notice> {
        self.grouping
            .malformed()
            .map(|err| Notice::MalformedSweepMetadata {
                reason: err.to_string(),
            })
            .into_iter()
            .collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn grouping(&self) -> &SweepGrouping {
        &self.grouping
    }

    pub fn roles(&self) -> &RoleAssignment {
        &self.roles
    }

    pub fn selection(&self) -> &PlotSelection {
        &self.selection
    }

    pub fn layout(&self) -> LayoutConfig {
        self.layout
    }

    /// Bumped by every accepted action
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn dim_id(&self, name: &str) -> Result<DimId, SessionError> {
        self.roles
            .id_of(name)
            .ok_or_else(|| SessionError::UnknownDimension(name.to_string()))
    }

    // =========================================================================
    // Operator actions
    // =========================================================================

    pub fn set_role(
        &mut self,
        dim_name: &str,
        role: Role,
        index: Option<usize>,
    ) -> Result<Vec<RoleChange>, SessionError> {
        let result = self
            .dim_id(dim_name)
            .and_then(|id| self.roles.assign(id, role, index).map_err(SessionError::from));
        self.accept("set_role", result)
    }

    pub fn set_fixed_index(&mut self, dim_name: &str, index: usize) -> Result<(), SessionError> {
        let result = self
            .dim_id(dim_name)
            .and_then(|id| self.roles.set_fixed_index(id, index).map_err(SessionError::from));
        self.accept("set_fixed_index", result)
    }

    /// Returns whether `name` is selected afterwards
    pub fn toggle_variable_selection(&mut self, name: &str) -> Result<bool, SessionError> {
        let result = if self.dataset.has_variable(name) {
            Ok(self.selection.toggle(name))
        } else {
            Err(SessionError::UnknownVariable(name.to_string()))
        };
        self.accept("toggle_variable_selection", result)
    }

    pub fn set_columns_per_row(&mut self, columns: usize) -> Result<(), SessionError> {
        let result = LayoutConfig::new(columns)
            .map(|layout| self.layout = layout)
            .ok_or(SessionError::InvalidColumns);
        self.accept("set_columns_per_row", result)
    }

    /// Show `member` for sweep group `group_index`, keeping the logical
    /// dimension's role and fixed index.
    pub fn set_active_sweep_member(&mut self, group_index: usize, member: &str) -> Result<(), SessionError> {
        let result = self
            .grouping
            .set_active_member(group_index, member)
            .map(|id| {
                let size = self.dataset.size(member).unwrap_or(0);
                self.roles.rename(id, member.to_string(), size);
            })
            .map_err(SessionError::from);
        self.accept("set_active_sweep_member", result)
    }

    fn accept<T>(&mut self, action: &str, result: Result<T, SessionError>) -> Result<T, SessionError> {
        match &result {
            Ok(_) => {
                self.revision += 1;
                tracing::debug!(action, revision = self.revision, "action applied");
            }
            Err(err) if err.is_contract_violation() => {
                tracing::error!(action, %err, "rejected action violates the engine contract");
            }
            Err(err) => tracing::warn!(action, %err, "action rejected"),
        }
        result
    }

    // =========================================================================
    // Reduction and rendering
    // =========================================================================

    /// Reduce every variable under the current roles
    pub fn reduce(&self) -> Result<Dataset, SessionError> {
        Ok(self.plan().apply(&self.dataset)?)
    }

    fn plan(&self) -> ReductionPlan {
        ReductionPlan::new(&self.grouping, &self.roles)
    }

    /// Reduce the selected variables and lay them out.
    ///
    /// An empty selection skips reduction entirely.
    pub fn render(&self) -> Result<Rendered, SessionError> {
        let rendered = |grid: Option<PlotGrid>, notices: Vec<Notice>| Rendered {
            revision: self.revision,
            grid,
            notices,
        };

        if self.selection.is_empty() {
            return Ok(rendered(None, Vec::new()));
        }
        if self.roles.x_axis().is_none() {
            return Ok(rendered(None, vec![Notice::NoXAxisSelected]));
        }

        let reduced = self.plan().apply_selected(&self.dataset, self.selection.names())?;
        let dims = match plot_dims(&self.roles, &reduced) {
            Ok(dims) => dims,
            Err(notice) => {
                tracing::debug!(%notice, "nothing to draw");
                return Ok(rendered(None, vec![notice]));
            }
        };

        let fixed = fixed_values(&self.dataset, &self.roles);
        let composed = compose(&reduced, &dims, &self.selection, self.layout, &fixed)?;
        Ok(rendered(composed.grid, composed.notices))
    }

    /// One-line summary of the role buckets
    pub fn describe_roles(&self) -> String {
        let names = |role: Role| {
            self.roles
                .with_role(role)
                .map(|d| match (role, d.fixed_index()) {
                    (Role::FixedIndex, Some(index)) => format!("{}[{index}]", d.name()),
                    _ => d.name().to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "average: [{}] fixed: [{}] x-axis: [{}] y-axis: [{}]",
            names(Role::Average),
            names(Role::FixedIndex),
            names(Role::XAxis),
            names(Role::YAxis),
        )
    }
}
