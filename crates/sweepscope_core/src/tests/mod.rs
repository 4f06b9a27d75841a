//! Engine-level tests for sweepscope_core
//!
//! Tests are organized by topic:
//! - `roles` - Default role policy, plot-axis uniqueness and cascades
//! - `sweeps` - Parallel sweep grouping and active member switching
//! - `reduction` - Averaging, fixed-index selection and squeezing
//! - `plot_grid` - Chart composition and grid layout
//! - `session` - Operator actions through the session context

mod session;
mod sweeps;
