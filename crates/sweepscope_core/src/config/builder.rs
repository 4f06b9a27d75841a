//! Dataset Builder
//!
//! The DatasetBuilder provides a fluent API for assembling a [`Dataset`]
//! from axis tick vectors and flat row-major variable buffers.
//!
//! # Example
//!
//! ```ignore
//! use sweepscope_core::config::DatasetBuilder;
//!
//! let dataset = DatasetBuilder::new("run 42")
//!     .axis("iteration", "", (0..10).map(f64::from).collect())
//!     .linspace("qubit1__freq", "Hz", 5.0e9, 5.1e9, 51)
//!     .variable("qubit1__state", &["iteration", "qubit1__freq"], values)
//!     .parallel_sweep_axes("{'0': ['iteration'], '1': ['qubit1__freq']}")
//!     .build()?;
//! ```

use rustc_hash::FxHashMap;

use crate::error::DatasetError;
use crate::model::{Coord, Dataset};
use crate::sweeps::PARALLEL_SWEEP_AXES;

/// Builder for a validated, immutable [`Dataset`]
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    name: String,
    axes: Vec<(String, Coord)>,
    variables: Vec<(String, Vec<String>, Vec<f64>)>,
    metadata: FxHashMap<String, String>,
}

impl DatasetBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // =========================================================================
    // Axes
    // =========================================================================

    /// Declare an axis with explicit tick values
    #[must_use]
    pub fn axis(mut self, name: impl Into<String>, unit: impl Into<String>, values: Vec<f64>) -> Self {
        self.axes.push((name.into(), Coord::new(values, unit)));
        self
    }

    /// Declare an axis with `count` evenly spaced ticks from `start` to `end`
    #[must_use]
    pub fn linspace(
        self,
        name: impl Into<String>,
        unit: impl Into<String>,
        start: f64,
        end: f64,
        count: usize,
    ) -> Self {
        let values = if count <= 1 {
            vec![start; count]
        } else {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        };
        self.axis(name, unit, values)
    }

    /// Declare an axis of integer ticks `0..count` (iteration counters)
    #[must_use]
    pub fn counter(self, name: impl Into<String>, count: usize) -> Self {
        self.axis(name, "", (0..count).map(|i| i as f64).collect())
    }

    // =========================================================================
    // Variables
    // =========================================================================

    /// Declare a result variable over `dims` with row-major `values`
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, dims: &[&str], values: Vec<f64>) -> Self {
        self.variables.push((
            name.into(),
            dims.iter().map(|d| d.to_string()).collect(),
            values,
        ));
        self
    }

    /// Declare a result variable filled from `f(flat_index)`
    #[must_use]
    pub fn variable_fn(
        self,
        name: impl Into<String>,
        dims: &[&str],
        f: impl Fn(usize) -> f64,
    ) -> Self {
        let len: usize = dims
            .iter()
            .map(|d| {
                self.axes
                    .iter()
                    .find(|(n, _)| n == d)
                    .map(|(_, c)| c.len())
                    .unwrap_or(0)
            })
            .product();
        let values = (0..len).map(f).collect();
        self.variable(name, dims, values)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    #[must_use]
    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the `parallel_sweep_axes` metadata field
    #[must_use]
    pub fn parallel_sweep_axes(self, raw: impl Into<String>) -> Self {
        self.metadata(PARALLEL_SWEEP_AXES, raw)
    }

    pub fn build(self) -> Result<Dataset, DatasetError> {
        Dataset::new(self.name, self.axes, self.variables, self.metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let ds = DatasetBuilder::new("lin")
            .linspace("f", "Hz", 1.0, 2.0, 5)
            .build()
            .unwrap();
        let coord = ds.coord("f").unwrap();
        assert_eq!(coord.values, vec![1.0, 1.25, 1.5, 1.75, 2.0]);
        assert_eq!(coord.unit, "Hz");
    }

    #[test]
    fn test_variable_fn_uses_axis_sizes() {
        let ds = DatasetBuilder::new("fn")
            .counter("a", 2)
            .counter("b", 3)
            .variable_fn("v", &["a", "b"], |i| i as f64)
            .build()
            .unwrap();
        assert_eq!(ds.variable("v").unwrap().shape(), &[2, 3]);
        assert_eq!(ds.sizes(), vec![("a", 2), ("b", 3)]);
    }
}
