//! Dataset construction
//!
//! Datasets normally come from the loading layer; the builder DSL covers
//! file loaders, benchmarks and tests:
//!
//! ```ignore
//! use sweepscope_core::config::DatasetBuilder;
//!
//! let dataset = DatasetBuilder::new("run 7")
//!     .counter("iteration", 10)
//!     .linspace("freq", "Hz", 4.0e9, 5.0e9, 50)
//!     .axis("power", "dBm", vec![-20.0])
//!     .variable_fn("signal", &["iteration", "freq", "power"], |i| i as f64)
//!     .build()?;
//! ```

mod builder;

pub use builder::DatasetBuilder;
