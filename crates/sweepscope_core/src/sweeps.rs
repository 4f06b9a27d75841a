//! Sweep grouping.
//!
//! Maps raw dataset axes to logical dimensions. Axes that were swept in
//! lockstep ("parallel" sweeps) are listed together in the
//! `parallel_sweep_axes` metadata field and collapse into one logical
//! dimension whose name is the group's active member.
//!
//! The metadata value is a JSON object mapping integer keys to axis lists,
//! possibly written with single quotes:
//!
//! ```text
//! {'0': ['iteration'], '1': ['q1__amp', 'q2__amp'], '2': ['q1__freq']}
//! ```

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{SweepError, SweepMetadataError};
use crate::model::{Dataset, DimId};

/// Metadata key describing parallel sweep groupings
pub const PARALLEL_SWEEP_AXES: &str = "parallel_sweep_axes";

/// Raw axes varied together, shown as one logical dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepGroup {
    group_index: usize,
    members: Vec<String>,
    active: usize,
}

impl SweepGroup {
    fn new(group_index: usize, members: Vec<String>) -> Self {
        Self {
            group_index,
            members,
            active: 0,
        }
    }

    pub fn group_index(&self) -> usize {
        self.group_index
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn active_name(&self) -> &str {
        &self.members[self.active]
    }

    pub fn inactive_members(&self) -> impl Iterator<Item = &str> {
        let active = self.active;
        self.members
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != active)
            .map(|(_, m)| m.as_str())
    }

    /// Whether more than one axis was swept in this group
    pub fn is_parallel(&self) -> bool {
        self.members.len() > 1
    }

    fn set_active(&mut self, name: &str) -> Result<(), SweepError> {
        let pos = self
            .members
            .iter()
            .position(|m| m == name)
            .ok_or_else(|| SweepError::InvalidMember {
                group: self.group_index,
                name: name.to_string(),
            })?;
        self.active = pos;
        Ok(())
    }
}

/// Partition of a dataset's axes into sweep groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepGrouping {
    groups: Vec<SweepGroup>,
    together_sweeps: bool,
    malformed: Option<SweepMetadataError>,
}

impl SweepGrouping {
    /// Group the axes of `dataset` using its `parallel_sweep_axes` metadata.
    ///
    /// Falls back to one group per axis when the field is absent or malformed.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let Some(raw) = dataset.metadata(PARALLEL_SWEEP_AXES) else {
            return Self::ungrouped(dataset.axes());
        };

        match parse_parallel_sweep_axes(raw).and_then(|parsed| build_groups(dataset, parsed)) {
            Ok(groups) => {
                tracing::debug!(groups = groups.len(), "loaded parallel sweep groups");
                Self {
                    groups,
                    together_sweeps: true,
                    malformed: None,
                }
            }
            Err(err) => {
                tracing::warn!(%err, raw, "ignoring malformed sweep metadata");
                Self {
                    malformed: Some(err),
                    ..Self::ungrouped(dataset.axes())
                }
            }
        }
    }

    /// One single-member group per axis, in declaration order
    pub fn ungrouped(axes: &[String]) -> Self {
        Self {
            groups: axes
                .iter()
                .enumerate()
                .map(|(i, axis)| SweepGroup::new(i, vec![axis.clone()]))
                .collect(),
            together_sweeps: false,
            malformed: None,
        }
    }

    pub fn groups(&self) -> &[SweepGroup] {
        &self.groups
    }

    pub fn group(&self, id: DimId) -> Option<&SweepGroup> {
        self.groups.get(id.0)
    }

    pub fn together_sweeps(&self) -> bool {
        self.together_sweeps
    }

    /// Why the sweep metadata was rejected, if it was
    pub fn malformed(&self) -> Option<&SweepMetadataError> {
        self.malformed.as_ref()
    }

    /// Logical dimension holding the group with metadata key `group_index`
    pub fn dim_of_group(&self, group_index: usize) -> Option<DimId> {
        self.groups
            .iter()
            .position(|g| g.group_index == group_index)
            .map(DimId)
    }

    /// `(active name, size)` per logical dimension, in group order
    pub fn logical_dimensions(&self, dataset: &Dataset) -> Vec<(String, usize)> {
        self.groups
            .iter()
            .map(|g| {
                let name = g.active_name().to_string();
                let size = dataset.size(&name).unwrap_or(0);
                (name, size)
            })
            .collect()
    }

    /// Change which member of a group is displayed.
    ///
    /// Returns the logical dimension that now carries the new name.
    pub fn set_active_member(&mut self, group_index: usize, name: &str) -> Result<DimId, SweepError> {
        let id = self
            .dim_of_group(group_index)
            .ok_or(SweepError::UnknownGroup(group_index))?;
        self.groups[id.0].set_active(name)?;
        Ok(id)
    }
}

/// Parse the `parallel_sweep_axes` field into `group key -> member axes`.
///
/// Single quotes are normalized to double quotes before parsing, so axis
/// names containing an apostrophe cannot be listed.
pub fn parse_parallel_sweep_axes(
    raw: &str,
) -> Result<BTreeMap<usize, Vec<String>>, SweepMetadataError> {
    let normalized = raw.replace('\'', "\"");
    let parsed: Vec<(String, Vec<String>)> =
        serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(&normalized)
            .map_err(|e| SweepMetadataError::Json(e.to_string()))?
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value::<Vec<String>>(value)
                    .map(|members| (key, members))
                    .map_err(|e| SweepMetadataError::Json(e.to_string()))
            })
            .collect::<Result<_, _>>()?;

    let mut groups = BTreeMap::new();
    for (key, members) in parsed {
        let index = key
            .trim()
            .parse::<usize>()
            .map_err(|_| SweepMetadataError::BadKey(key.clone()))?;
        if groups.insert(index, members).is_some() {
            return Err(SweepMetadataError::DuplicateKey(index));
        }
    }
    Ok(groups)
}

fn build_groups(
    dataset: &Dataset,
    parsed: BTreeMap<usize, Vec<String>>,
) -> Result<Vec<SweepGroup>, SweepMetadataError> {
    let mut claimed = FxHashSet::default();
    let mut groups = Vec::with_capacity(parsed.len());

    for (group_index, members) in parsed {
        let Some(first) = members.first() else {
            return Err(SweepMetadataError::EmptyGroup(group_index));
        };
        let expected = dataset
            .size(first)
            .ok_or_else(|| SweepMetadataError::UnknownAxis {
                group: group_index,
                axis: first.clone(),
            })?;
        for member in &members {
            let actual = dataset
                .size(member)
                .ok_or_else(|| SweepMetadataError::UnknownAxis {
                    group: group_index,
                    axis: member.clone(),
                })?;
            if actual != expected {
                return Err(SweepMetadataError::SizeMismatch {
                    group: group_index,
                    axis: member.clone(),
                    expected,
                    actual,
                });
            }
            if !claimed.insert(member.clone()) {
                return Err(SweepMetadataError::AxisInTwoGroups(member.clone()));
            }
        }
        for (variable, data) in dataset.variables() {
            if members.iter().filter(|m| data.spans(m)).count() > 1 {
                return Err(SweepMetadataError::VariableSpansGroup {
                    variable: variable.to_string(),
                    group: group_index,
                });
            }
        }
        groups.push(SweepGroup::new(group_index, members));
    }

    // Axes the metadata does not mention stay on their own
    let mut next_index = groups.last().map(|g| g.group_index + 1).unwrap_or(0);
    for axis in dataset.axes() {
        if !claimed.contains(axis) {
            groups.push(SweepGroup::new(next_index, vec![axis.clone()]));
            next_index += 1;
        }
    }

    // Logical order follows the declared position of each group's first member
    let declared = |group: &SweepGroup| {
        dataset
            .axes()
            .iter()
            .position(|axis| axis == &group.members[0])
            .unwrap_or(usize::MAX)
    };
    groups.sort_by_key(declared);
    Ok(groups)
}
