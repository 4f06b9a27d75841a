//! Axis-role assignment engine.
//!
//! [`RoleAssignment`] is the single source of truth for which logical
//! dimension plays which [`Role`]. Each [`Dimension`] stores its own role and
//! the role buckets ([`RoleAssignmentState`]) are derived from them, so the two
//! views cannot drift apart. [`RoleAssignment::assign`] is the only writer.
//!
//! x-axis and y-axis are unique: claiming one that another dimension holds
//! demotes the previous holder to a fixed index (its last recorded index, or 0).

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::AssignError;
use crate::model::{DimId, Role};

/// Substring marking repetition axes that are averaged by default
pub const ITERATION_MARKER: &str = "iteration";

/// A logical dimension and its current display role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    name: String,
    size: usize,
    role: Option<Role>,
    fixed_index: Option<usize>,
}

impl Dimension {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Last index recorded for this dimension, whether or not it is currently fixed
    pub fn fixed_index(&self) -> Option<usize> {
        self.fixed_index
    }

    fn check_index(&self, index: usize) -> Result<(), AssignError> {
        if index < self.size {
            Ok(())
        } else {
            Err(AssignError::IndexOutOfRange {
                dimension: self.name.clone(),
                index,
                size: self.size,
            })
        }
    }
}

/// One role transition performed by [`RoleAssignment::assign`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleChange {
    pub dim: DimId,
    pub from: Option<Role>,
    pub to: Role,
}

/// Bucketed view of the current assignment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleAssignmentState {
    pub average: Vec<DimId>,
    pub fixed: Vec<DimId>,
    pub x_axis: Option<DimId>,
    pub y_axis: Option<DimId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    dims: Vec<Dimension>,
}

impl RoleAssignment {
    /// Dimensions without any role
    pub fn unassigned(dims: impl IntoIterator<Item = (String, usize)>) -> Self {
        Self {
            dims: dims
                .into_iter()
                .map(|(name, size)| Dimension {
                    name,
                    size,
                    role: None,
                    fixed_index: None,
                })
                .collect(),
        }
    }

    /// Dimensions with the default policy applied:
    ///
    /// 1. every dimension whose name contains `"iteration"` is averaged
    /// 2. the innermost (last declared) remaining dimension becomes the x-axis
    /// 3. the next innermost remaining dimension becomes the y-axis
    /// 4. everything else is fixed at index 0
    pub fn with_defaults(dims: impl IntoIterator<Item = (String, usize)>) -> Self {
        let mut assignment = Self::unassigned(dims);
        assignment.apply_default_policy();
        assignment
    }

    fn apply_default_policy(&mut self) {
        let ids: Vec<DimId> = (0..self.dims.len()).map(DimId).collect();
        let averaged: Vec<DimId> = ids
            .iter()
            .copied()
            .filter(|id| self.dims[id.0].name.contains(ITERATION_MARKER))
            .collect();
        let mut remaining = ids.iter().rev().copied().filter(|id| !averaged.contains(id));
        let x_axis = remaining.next();
        let y_axis = remaining.next();

        let plan: Vec<(DimId, Role)> = ids
            .iter()
            .map(|&id| {
                let role = if averaged.contains(&id) {
                    Role::Average
                } else if Some(id) == x_axis {
                    Role::XAxis
                } else if Some(id) == y_axis {
                    Role::YAxis
                } else {
                    Role::FixedIndex
                };
                (id, role)
            })
            .collect();

        for (id, role) in plan {
            if let Err(err) = self.assign(id, role, Some(0)) {
                tracing::warn!(%err, "default role could not be applied");
            }
        }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn dimension(&self, id: DimId) -> Option<&Dimension> {
        self.dims.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.dims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<DimId> {
        self.dims.iter().position(|d| d.name == name).map(DimId)
    }

    /// Dimension currently holding `role` (the first one for bucket roles)
    pub fn holder(&self, role: Role) -> Option<DimId> {
        self.dims.iter().position(|d| d.role == Some(role)).map(DimId)
    }

    pub fn x_axis(&self) -> Option<&Dimension> {
        self.holder(Role::XAxis).and_then(|id| self.dimension(id))
    }

    pub fn y_axis(&self) -> Option<&Dimension> {
        self.holder(Role::YAxis).and_then(|id| self.dimension(id))
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &Dimension> {
        self.dims.iter().filter(move |d| d.role == Some(role))
    }

    pub fn state(&self) -> RoleAssignmentState {
        let mut state = RoleAssignmentState::default();
        for (i, dim) in self.dims.iter().enumerate() {
            let id = DimId(i);
            match dim.role {
                Some(Role::Average) => state.average.push(id),
                Some(Role::FixedIndex) => state.fixed.push(id),
                Some(Role::XAxis) => state.x_axis = Some(id),
                Some(Role::YAxis) => state.y_axis = Some(id),
                None => {}
            }
        }
        state
    }

    /// Give `id` a new role.
    ///
    /// `index` only matters for [`Role::FixedIndex`] and defaults to 0. Taking
    /// the x-axis or y-axis from another dimension moves that dimension to
    /// [`Role::FixedIndex`] at its previously recorded index. Every transition
    /// performed is returned in order. On error nothing changes.
    pub fn assign(
        &mut self,
        id: DimId,
        role: Role,
        index: Option<usize>,
    ) -> Result<Vec<RoleChange>, AssignError> {
        let dim = self
            .dims
            .get(id.0)
            .ok_or(AssignError::UnknownDimension(id))?;
        if role == Role::FixedIndex {
            dim.check_index(index.unwrap_or(0))?;
        }

        let mut changes = Vec::new();
        let mut visited = FxHashSet::default();
        let mut next = Some((id, role, index));

        while let Some((id, role, index)) = next.take() {
            if !visited.insert(id) {
                tracing::warn!(?id, ?role, "role cascade revisited a dimension");
                break;
            }

            let previous = if role.is_plot_axis() {
                self.holder(role).filter(|&holder| holder != id)
            } else {
                None
            };

            let dim = &mut self.dims[id.0];
            let from = dim.role.replace(role);
            if role == Role::FixedIndex {
                dim.fixed_index = Some(index.unwrap_or(0));
            }
            changes.push(RoleChange { dim: id, from, to: role });

            if let Some(previous) = previous {
                let displaced = &self.dims[previous.0];
                let index = displaced
                    .fixed_index
                    .filter(|&i| i < displaced.size)
                    .unwrap_or(0);
                tracing::debug!(
                    from = displaced.name.as_str(),
                    to = self.dims[id.0].name.as_str(),
                    %role,
                    index,
                    "moving role, previous holder falls back to a fixed index"
                );
                next = Some((previous, Role::FixedIndex, Some(index)));
            }
        }

        Ok(changes)
    }

    /// Record the index a dimension uses while fixed.
    ///
    /// Takes effect immediately when the dimension is fixed, otherwise the
    /// index is remembered for the next time it falls back to a fixed index.
    pub fn set_fixed_index(&mut self, id: DimId, index: usize) -> Result<(), AssignError> {
        let dim = self
            .dims
            .get_mut(id.0)
            .ok_or(AssignError::UnknownDimension(id))?;
        dim.check_index(index)?;
        dim.fixed_index = Some(index);
        Ok(())
    }

    /// Point a logical dimension at a different raw axis, keeping its role
    /// and fixed index.
    pub(crate) fn rename(&mut self, id: DimId, name: String, size: usize) {
        let Some(dim) = self.dims.get_mut(id.0) else {
            return;
        };
        tracing::debug!(from = dim.name.as_str(), to = name.as_str(), "renaming dimension");
        dim.name = name;
        dim.size = size;
        if dim.fixed_index.is_some_and(|index| index >= size) {
            tracing::warn!(size, "fixed index past the end of renamed axis, clamping");
            dim.fixed_index = Some(size.saturating_sub(1));
        }
    }
}
