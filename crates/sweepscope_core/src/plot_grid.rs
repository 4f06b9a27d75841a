//! Plot grid composition.
//!
//! Turns a reduced dataset and the plot selection into chart records the
//! renderer can draw without knowing anything about datasets: plain number
//! vectors and strings.
//!
//! - 1-D: every selected variable becomes a series of a single overlaid line
//!   chart, titled with the fixed values of all fixed dimensions.
//! - 2-D: every selected variable becomes its own heatmap (`z[y][x]`),
//!   laid out left-to-right, top-to-bottom in rows of `columns_per_row`.

use std::fmt;

use ndarray::Ix2;
use serde::Serialize;

use crate::error::ReduceError;
use crate::format::{AxisLabel, format_tick, pretty_name};
use crate::model::{Dataset, LayoutConfig, PlotSelection, Role};
use crate::notice::Notice;
use crate::reduction::PlotDims;
use crate::roles::RoleAssignment;

// =============================================================================
// Chart records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub series_name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: AxisLabel,
    pub x: Vec<f64>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapChart {
    pub title: String,
    pub x_label: AxisLabel,
    pub y_label: AxisLabel,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Row-per-y matrix: `z[j][i]` is the value at `(x[i], y[j])`
    pub z: Vec<Vec<f64>>,
}

impl HeatmapChart {
    /// Finite `(min, max)` of `z`, `None` if every cell is NaN
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.z
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Line(LineChart),
    Heatmap(HeatmapChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(chart) => &chart.title,
            ChartSpec::Heatmap(chart) => &chart.title,
        }
    }
}

/// Charts arranged in rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotGrid {
    rows: Vec<Vec<ChartSpec>>,
    columns_per_row: usize,
}

impl PlotGrid {
    pub fn rows(&self) -> &[Vec<ChartSpec>] {
        &self.rows
    }

    /// Effective column count (never more than the number of charts)
    pub fn columns_per_row(&self) -> usize {
        self.columns_per_row
    }

    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.rows.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Fixed values
// =============================================================================

/// The coordinate a fixed dimension is pinned to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedValue {
    pub name: String,
    pub index: usize,
    pub value: Option<f64>,
    pub unit: String,
}

impl fmt::Display for FixedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{} = {}", pretty_name(&self.name), format_tick(value, &self.unit)),
            None => write!(f, "{} = #{}", pretty_name(&self.name), self.index),
        }
    }
}

/// Fixed values of every fixed dimension, in dimension order
pub fn fixed_values(dataset: &Dataset, roles: &RoleAssignment) -> Vec<FixedValue> {
    roles
        .with_role(Role::FixedIndex)
        .map(|dim| {
            let index = dim.fixed_index().unwrap_or(0);
            let coord = dataset.coord(dim.name());
            FixedValue {
                name: dim.name().to_string(),
                index,
                value: coord.and_then(|c| c.tick(index)),
                unit: coord.map(|c| c.unit.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

// =============================================================================
// Composition
// =============================================================================

/// Result of one composition pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composed {
    /// `None` when nothing is selected or every selected variable was skipped
    pub grid: Option<PlotGrid>,
    pub notices: Vec<Notice>,
}

/// Lay out the selected variables of `reduced` as charts.
///
/// `reduced` must already have exactly the axes named by `dims`.
pub fn compose(
    reduced: &Dataset,
    dims: &PlotDims,
    selection: &PlotSelection,
    layout: LayoutConfig,
    fixed: &[FixedValue],
) -> Result<Composed, ReduceError> {
    if selection.is_empty() {
        return Ok(Composed::default());
    }
    match dims {
        PlotDims::Line { x } => compose_line(reduced, x, selection, fixed),
        PlotDims::Grid { x, y } => compose_heatmaps(reduced, x, y, selection, layout),
    }
}

fn compose_line(
    reduced: &Dataset,
    x: &str,
    selection: &PlotSelection,
    fixed: &[FixedValue],
) -> Result<Composed, ReduceError> {
    let mut notices = Vec::new();
    let mut series = Vec::with_capacity(selection.len());

    for name in selection.names() {
        let variable = reduced
            .variable(name)
            .ok_or_else(|| ReduceError::UnknownVariable(name.clone()))?;
        let Some(values) = variable.oriented(&[x]) else {
            if variable.spans(x) {
                return Err(ReduceError::Orientation {
                    variable: name.clone(),
                    expected: vec![x.to_string()],
                });
            }
            notices.push(Notice::VariableSkipped {
                variable: name.clone(),
                missing: vec![x.to_string()],
            });
            continue;
        };
        series.push(LineSeries {
            series_name: pretty_name(name),
            values: values.iter().copied().collect(),
        });
    }

    if series.is_empty() {
        return Ok(Composed { grid: None, notices });
    }

    let coord = reduced.coord(x).cloned().unwrap_or_default();
    let title = fixed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    let chart = ChartSpec::Line(LineChart {
        title,
        x_label: AxisLabel::new(x, &coord.unit),
        x: coord.values,
        series,
    });
    Ok(Composed {
        grid: Some(PlotGrid {
            rows: vec![vec![chart]],
            columns_per_row: 1,
        }),
        notices,
    })
}

fn compose_heatmaps(
    reduced: &Dataset,
    x: &str,
    y: &str,
    selection: &PlotSelection,
    layout: LayoutConfig,
) -> Result<Composed, ReduceError> {
    let x_coord = reduced.coord(x).cloned().unwrap_or_default();
    let y_coord = reduced.coord(y).cloned().unwrap_or_default();
    let x_label = AxisLabel::new(x, &x_coord.unit);
    let y_label = AxisLabel::new(y, &y_coord.unit);

    let mut notices = Vec::new();
    let mut charts = Vec::with_capacity(selection.len());

    for name in selection.names() {
        let variable = reduced
            .variable(name)
            .ok_or_else(|| ReduceError::UnknownVariable(name.clone()))?;
        let missing: Vec<String> = [y, x]
            .into_iter()
            .filter(|axis| !variable.spans(axis))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            notices.push(Notice::VariableSkipped {
                variable: name.clone(),
                missing,
            });
            continue;
        }

        let orientation_error = || ReduceError::Orientation {
            variable: name.clone(),
            expected: vec![y.to_string(), x.to_string()],
        };
        let matrix = variable
            .oriented(&[y, x])
            .ok_or_else(orientation_error)?
            .into_dimensionality::<Ix2>()
            .map_err(|_| orientation_error())?;

        charts.push(ChartSpec::Heatmap(HeatmapChart {
            title: pretty_name(name),
            x_label: x_label.clone(),
            y_label: y_label.clone(),
            x: x_coord.values.clone(),
            y: y_coord.values.clone(),
            z: matrix.rows().into_iter().map(|row| row.to_vec()).collect(),
        }));
    }

    if charts.is_empty() {
        return Ok(Composed { grid: None, notices });
    }

    let columns_per_row = layout.columns_per_row().min(charts.len());
    let rows = charts
        .chunks(columns_per_row)
        .map(<[ChartSpec]>::to_vec)
        .collect();
    Ok(Composed {
        grid: Some(PlotGrid { rows, columns_per_row }),
        notices,
    })
}
