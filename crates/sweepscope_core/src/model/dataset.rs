//! Immutable labeled dataset supplied by the loading layer.
//!
//! A [`Dataset`] holds a set of named axes (each with tick values and a unit)
//! and a set of named result variables, each an N-dimensional array indexed by
//! a subset of the axes. Datasets are never mutated in place: the reduction
//! pipeline builds new ones.

use std::fmt;

use ndarray::{ArrayD, Axis, IxDyn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, ReduceError};
use crate::format::format_tick;

/// Tick values along one axis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub values: Vec<f64>,
    #[serde(default)]
    pub unit: String,
}

impl Coord {
    pub fn new(values: Vec<f64>, unit: impl Into<String>) -> Self {
        Self {
            values,
            unit: unit.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn tick(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }
}

/// A result variable: an array plus the names of the axes indexing it
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Vec<String>,
    data: ArrayD<f64>,
}

impl Variable {
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn axis_of(&self, name: &str) -> Option<usize> {
        self.dims.iter().position(|d| d == name)
    }

    pub fn spans(&self, name: &str) -> bool {
        self.axis_of(name).is_some()
    }

    /// Values in row-major order (last axis fastest)
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// The array with its axes permuted into `order`.
    ///
    /// Returns `None` unless `order` names every axis of the variable exactly once.
    pub fn oriented(&self, order: &[&str]) -> Option<ArrayD<f64>> {
        let perm = order
            .iter()
            .map(|name| self.axis_of(name))
            .collect::<Option<Vec<usize>>>()?;
        let mut unique = perm.clone();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != self.ndim() || perm.len() != self.ndim() {
            return None;
        }
        Some(self.data.view().permuted_axes(IxDyn(&perm)).to_owned())
    }

    pub(crate) fn rename_axis(&mut self, from: &str, to: &str) -> bool {
        match self.dims.iter_mut().find(|d| d.as_str() == from) {
            Some(dim) => {
                *dim = to.to_string();
                true
            }
            None => false,
        }
    }

    /// NaN-skipping mean along `name`. `None` when the variable does not span it.
    pub(crate) fn mean_over(&self, name: &str) -> Option<Variable> {
        let axis = self.axis_of(name)?;
        let data = self
            .data
            .map_axis(Axis(axis), |lane| nan_mean(lane.iter().copied()));
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Some(Variable { dims, data })
    }

    /// Select a single index along `name`, dropping the axis.
    pub(crate) fn select(&self, name: &str, index: usize) -> Result<Option<Variable>, ReduceError> {
        let Some(axis) = self.axis_of(name) else {
            return Ok(None);
        };
        let size = self.data.len_of(Axis(axis));
        if index >= size {
            return Err(ReduceError::IndexOutOfRange {
                axis: name.to_string(),
                index,
                size,
            });
        }
        let data = self.data.index_axis(Axis(axis), index).to_owned();
        let mut dims = self.dims.clone();
        dims.remove(axis);
        Ok(Some(Variable { dims, data }))
    }
}

fn nan_mean(lane: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = lane
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Named-axis, named-variable container
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    axes: Vec<String>,
    coords: FxHashMap<String, Coord>,
    variables: Vec<(String, Variable)>,
    metadata: FxHashMap<String, String>,
}

impl Dataset {
    /// Validate and assemble a dataset.
    ///
    /// `variables` holds `(name, axis names, row-major values)` triples.
    pub fn new(
        name: impl Into<String>,
        axes: Vec<(String, Coord)>,
        variables: Vec<(String, Vec<String>, Vec<f64>)>,
        metadata: FxHashMap<String, String>,
    ) -> Result<Self, DatasetError> {
        let mut axis_names = Vec::with_capacity(axes.len());
        let mut coords = FxHashMap::default();
        for (axis, coord) in axes {
            if coord.is_empty() {
                return Err(DatasetError::EmptyAxis(axis));
            }
            if coords.contains_key(&axis) {
                return Err(DatasetError::DuplicateAxis(axis));
            }
            axis_names.push(axis.clone());
            coords.insert(axis, coord);
        }

        let mut seen = FxHashSet::default();
        let mut built = Vec::with_capacity(variables.len());
        for (variable, dims, values) in variables {
            if !seen.insert(variable.clone()) {
                return Err(DatasetError::DuplicateVariable(variable));
            }
            let mut shape = Vec::with_capacity(dims.len());
            for (i, dim) in dims.iter().enumerate() {
                let Some(coord) = coords.get(dim) else {
                    return Err(DatasetError::UnknownAxis {
                        variable,
                        axis: dim.clone(),
                    });
                };
                if dims[..i].contains(dim) {
                    return Err(DatasetError::RepeatedAxis {
                        variable,
                        axis: dim.clone(),
                    });
                }
                shape.push(coord.len());
            }
            let expected: usize = shape.iter().product();
            if values.len() != expected {
                return Err(DatasetError::ShapeMismatch {
                    variable,
                    shape,
                    expected,
                    actual: values.len(),
                });
            }
            let actual = values.len();
            let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|_| {
                DatasetError::ShapeMismatch {
                    variable: variable.clone(),
                    shape: shape.clone(),
                    expected,
                    actual,
                }
            })?;
            built.push((variable, Variable { dims, data }));
        }

        Ok(Self {
            name: name.into(),
            axes: axis_names,
            coords,
            variables: built,
            metadata,
        })
    }

    /// Assemble a dataset from already consistent parts (used by reduction)
    pub(crate) fn from_parts(
        name: String,
        axes: Vec<String>,
        coords: FxHashMap<String, Coord>,
        variables: Vec<(String, Variable)>,
        metadata: FxHashMap<String, String>,
    ) -> Self {
        Self {
            name,
            axes,
            coords,
            variables,
            metadata,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis names in declaration order
    pub fn axes(&self) -> &[String] {
        &self.axes
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn size(&self, axis: &str) -> Option<usize> {
        self.coords.get(axis).map(Coord::len)
    }

    /// `(axis, size)` pairs in declaration order
    pub fn sizes(&self) -> Vec<(&str, usize)> {
        self.axes
            .iter()
            .filter_map(|a| self.size(a).map(|s| (a.as_str(), s)))
            .collect()
    }

    pub fn coord(&self, axis: &str) -> Option<&Coord> {
        self.coords.get(axis)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Variables in declaration order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.iter().any(|(n, _)| n == name)
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub(crate) fn metadata_map(&self) -> &FxHashMap<String, String> {
        &self.metadata
    }

    /// Overview of the whole run: axes with their ranges, variables with
    /// their dims, and the metadata fields sorted by key.
    pub fn describe(&self) -> DatasetSummary {
        let axes = self
            .axes
            .iter()
            .filter_map(|name| {
                let coord = self.coords.get(name)?;
                Some(AxisSummary {
                    name: name.clone(),
                    size: coord.len(),
                    unit: coord.unit.clone(),
                    first: coord.values.first().copied().unwrap_or(f64::NAN),
                    last: coord.values.last().copied().unwrap_or(f64::NAN),
                })
            })
            .collect();

        let variables = self
            .variables
            .iter()
            .map(|(name, variable)| VariableSummary {
                name: name.clone(),
                dims: variable.dims.clone(),
                shape: variable.shape().to_vec(),
                missing: variable.data.iter().filter(|v| v.is_nan()).count(),
            })
            .collect();

        let mut metadata: Vec<(String, String)> = self
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        metadata.sort();

        DatasetSummary {
            name: self.name.clone(),
            axes,
            variables,
            metadata,
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisSummary {
    pub name: String,
    pub size: usize,
    pub unit: String,
    pub first: f64,
    pub last: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    /// NaN samples, e.g. from an interrupted run
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub axes: Vec<AxisSummary>,
    pub variables: Vec<VariableSummary>,
    pub metadata: Vec<(String, String)>,
}

impl DatasetSummary {
    /// One line per entry, grouped under section headers
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone(), "axes:".to_string()];
        for axis in &self.axes {
            lines.push(format!(
                "  {} [{}]  {} .. {}",
                axis.name,
                axis.size,
                format_tick(axis.first, &axis.unit),
                format_tick(axis.last, &axis.unit)
            ));
        }
        lines.push("variables:".to_string());
        for variable in &self.variables {
            let mut line = format!("  {} ({})", variable.name, variable.dims.join(", "));
            if variable.missing > 0 {
                line.push_str(&format!("  {} missing", variable.missing));
            }
            lines.push(line);
        }
        if !self.metadata.is_empty() {
            lines.push("metadata:".to_string());
            for (key, value) in &self.metadata {
                lines.push(format!("  {key} = {value}"));
            }
        }
        lines
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}
