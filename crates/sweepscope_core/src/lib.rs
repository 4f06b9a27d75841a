//! Sweep dataset reduction library
//!
//! This crate turns a labeled, multi-dimensional measurement dataset into
//! 1-D or 2-D slices ready for plotting. It supports:
//! - Parallel sweep groups collapsed into one logical dimension
//! - Per-dimension display roles (average, fixed index, x-axis, y-axis) with
//!   unique plot axes and cascading reassignment
//! - Mean and single-index reduction down to the plotted axes
//! - Plot grid composition (overlaid line charts or heatmap grids)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sweepscope_core::{DatasetBuilder, Role, RunSession};
//!
//! let dataset = DatasetBuilder::new("run 7")
//!     .counter("iteration", 10)
//!     .linspace("freq", "Hz", 4.0e9, 5.0e9, 50)
//!     .axis("power", "dBm", vec![-30.0, -20.0])
//!     .variable_fn("signal", &["iteration", "freq", "power"], |i| i as f64)
//!     .build()?;
//!
//! let mut session = RunSession::open(Arc::new(dataset));
//! session.set_role("power", Role::FixedIndex, Some(1))?;
//! let rendered = session.render()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod debounce;
pub mod error;
pub mod format;
pub mod notice;
pub mod plot_grid;
pub mod reduction;
pub mod roles;
pub mod session;
pub mod sweeps;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::DatasetBuilder;
pub use error::{AssignError, DatasetError, ReduceError, SessionError, SweepError, SweepMetadataError};
pub use model::{Coord, Dataset, DatasetSummary, DimId, LayoutConfig, PlotSelection, Role, Variable};
pub use notice::Notice;
pub use plot_grid::{ChartSpec, HeatmapChart, LineChart, LineSeries, PlotGrid};
pub use reduction::{PlotDims, ReductionPlan, plot_dims, reduce};
pub use roles::{Dimension, RoleAssignment, RoleAssignmentState, RoleChange};
pub use session::{Rendered, RunSession, SessionOptions};
pub use sweeps::{SweepGroup, SweepGrouping};
