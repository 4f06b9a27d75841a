//! Reduction pipeline.
//!
//! Turns the full dataset plus the current role assignment into a dataset
//! whose axes are exactly the plotted ones:
//!
//! 0. inactive members of parallel sweep groups are relabeled to the active
//!    member (lockstep axes share step positions)
//! 1. every averaged dimension is mean-reduced (NaN samples skipped)
//! 2. every fixed dimension is reduced to the single coordinate at its index
//! 3. any leftover size-1 axis that is not a plot axis is squeezed out
//!
//! The pipeline is a pure function of its inputs: the same roles always give
//! bit-identical output.

use std::borrow::Cow;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ReduceError;
use crate::model::{Coord, Dataset, Role, Variable};
use crate::notice::{Notice, OffendingAxis};
use crate::roles::RoleAssignment;
use crate::sweeps::SweepGrouping;

/// The reduction steps implied by one role assignment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReductionPlan {
    lockstep: Vec<(String, Vec<String>)>,
    average: Vec<String>,
    fixed: Vec<(String, usize)>,
    keep: Vec<String>,
}

impl ReductionPlan {
    pub fn new(grouping: &SweepGrouping, roles: &RoleAssignment) -> Self {
        let lockstep = grouping
            .groups()
            .iter()
            .filter(|g| g.is_parallel())
            .map(|g| {
                (
                    g.active_name().to_string(),
                    g.inactive_members().map(str::to_string).collect(),
                )
            })
            .collect();

        let mut average = Vec::new();
        let mut fixed = Vec::new();
        for dim in roles.dimensions() {
            match dim.role() {
                Some(Role::Average) => average.push(dim.name().to_string()),
                Some(Role::FixedIndex) => {
                    fixed.push((dim.name().to_string(), dim.fixed_index().unwrap_or(0)))
                }
                _ => {}
            }
        }

        let keep = [roles.x_axis(), roles.y_axis()]
            .into_iter()
            .flatten()
            .map(|d| d.name().to_string())
            .collect();

        Self {
            lockstep,
            average,
            fixed,
            keep,
        }
    }

    pub fn averaged(&self) -> &[String] {
        &self.average
    }

    pub fn fixed(&self) -> &[(String, usize)] {
        &self.fixed
    }

    /// Axes that survive reduction regardless of size
    pub fn kept(&self) -> &[String] {
        &self.keep
    }

    /// Reduce every variable of `dataset`
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset, ReduceError> {
        self.reduce_variables(dataset, dataset.variables().collect())
    }

    /// Reduce only the named variables, in dataset order
    pub fn apply_selected(&self, dataset: &Dataset, names: &[String]) -> Result<Dataset, ReduceError> {
        for name in names {
            if !dataset.has_variable(name) {
                return Err(ReduceError::UnknownVariable(name.clone()));
            }
        }
        let selected = dataset
            .variables()
            .filter(|(name, _)| names.iter().any(|n| n == name))
            .collect();
        self.reduce_variables(dataset, selected)
    }

    fn reduce_variables(
        &self,
        dataset: &Dataset,
        selected: Vec<(&str, &Variable)>,
    ) -> Result<Dataset, ReduceError> {
        #[cfg(feature = "parallel")]
        let variables = selected
            .par_iter()
            .map(|(name, variable)| self.reduce_variable(variable).map(|v| (name.to_string(), v)))
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(not(feature = "parallel"))]
        let variables = selected
            .iter()
            .map(|(name, variable)| self.reduce_variable(variable).map(|v| (name.to_string(), v)))
            .collect::<Result<Vec<_>, _>>()?;

        let axes = self.reduced_axes(dataset);
        let coords: FxHashMap<String, Coord> = axes
            .iter()
            .filter_map(|a| dataset.coord(a).map(|c| (a.clone(), c.clone())))
            .collect();

        Ok(Dataset::from_parts(
            dataset.name().to_string(),
            axes,
            coords,
            variables,
            dataset.metadata_map().clone(),
        ))
    }

    fn reduce_variable(&self, variable: &Variable) -> Result<Variable, ReduceError> {
        let mut current = Cow::Borrowed(variable);

        for (active, others) in &self.lockstep {
            for other in others {
                if current.spans(other) {
                    current.to_mut().rename_axis(other, active);
                }
            }
        }

        for name in &self.average {
            if let Some(mean) = current.mean_over(name) {
                current = Cow::Owned(mean);
            }
        }

        for (name, index) in &self.fixed {
            if let Some(selected) = current.select(name, *index)? {
                current = Cow::Owned(selected);
            }
        }

        let squeeze: Vec<String> = current
            .dims()
            .iter()
            .zip(current.shape())
            .filter(|&(dim, &size)| size == 1 && !self.keep.contains(dim))
            .map(|(dim, _)| dim.clone())
            .collect();
        for name in squeeze {
            if let Some(squeezed) = current.select(&name, 0)? {
                current = Cow::Owned(squeezed);
            }
        }

        Ok(current.into_owned())
    }

    fn reduced_axes(&self, dataset: &Dataset) -> Vec<String> {
        let inactive: FxHashSet<&str> = self
            .lockstep
            .iter()
            .flat_map(|(_, others)| others.iter().map(String::as_str))
            .collect();
        dataset
            .axes()
            .iter()
            .filter(|a| !inactive.contains(a.as_str()))
            .filter(|a| !self.average.contains(*a) && !self.fixed.iter().any(|(n, _)| n == *a))
            .filter(|a| self.keep.contains(*a) || dataset.size(a) != Some(1))
            .cloned()
            .collect()
    }
}

/// Reduce every variable of `dataset` under the current roles
pub fn reduce(
    dataset: &Dataset,
    grouping: &SweepGrouping,
    roles: &RoleAssignment,
) -> Result<Dataset, ReduceError> {
    ReductionPlan::new(grouping, roles).apply(dataset)
}

/// Axes a reduced dataset can be drawn with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotDims {
    Line { x: String },
    Grid { x: String, y: String },
}

impl PlotDims {
    pub fn x(&self) -> &str {
        match self {
            PlotDims::Line { x } | PlotDims::Grid { x, .. } => x,
        }
    }

    pub fn ndim(&self) -> usize {
        match self {
            PlotDims::Line { .. } => 1,
            PlotDims::Grid { .. } => 2,
        }
    }
}

/// Decide whether `reduced` can be drawn.
///
/// Both failures are expected states reported to the operator, not errors.
pub fn plot_dims(roles: &RoleAssignment, reduced: &Dataset) -> Result<PlotDims, Notice> {
    let Some(x) = roles.x_axis() else {
        return Err(Notice::NoXAxisSelected);
    };
    let y = roles.y_axis();

    let expected = |axis: &str| axis == x.name() || y.is_some_and(|y| y.name() == axis);
    if reduced.axes().iter().any(|a| !expected(a.as_str())) {
        let axes = reduced
            .axes()
            .iter()
            .map(|name| OffendingAxis {
                name: name.clone(),
                role: roles
                    .id_of(name)
                    .and_then(|id| roles.dimension(id))
                    .and_then(|d| d.role()),
            })
            .collect();
        return Err(Notice::DimensionalityTooHigh { axes });
    }

    Ok(match y {
        Some(y) => PlotDims::Grid {
            x: x.name().to_string(),
            y: y.name().to_string(),
        },
        None => PlotDims::Line {
            x: x.name().to_string(),
        },
    })
}
