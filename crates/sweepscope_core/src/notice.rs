use std::fmt;

use serde::Serialize;

use crate::format::pretty_name;
use crate::model::Role;

/// A reduced axis that keeps a plot from being drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffendingAxis {
    pub name: String,
    pub role: Option<Role>,
}

/// Non-fatal, operator-facing state reported instead of a plot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// No dimension holds the x-axis yet
    NoXAxisSelected,
    /// The reduced data has axes besides the x-axis and y-axis
    DimensionalityTooHigh { axes: Vec<OffendingAxis> },
    /// `parallel_sweep_axes` was ignored
    MalformedSweepMetadata { reason: String },
    /// A selected result does not span every plotted axis
    VariableSkipped { variable: String, missing: Vec<String> },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoXAxisSelected => write!(f, "Select an x-axis dimension to display plots"),
            Notice::DimensionalityTooHigh { axes } => {
                write!(f, "Too many dimensions to plot:")?;
                for axis in axes {
                    match axis.role {
                        Some(role) => write!(f, " {} ({role})", pretty_name(&axis.name))?,
                        None => write!(f, " {} (no role)", pretty_name(&axis.name))?,
                    }
                }
                Ok(())
            }
            Notice::MalformedSweepMetadata { reason } => {
                write!(f, "Parallel sweep info ignored: {reason}")
            }
            Notice::VariableSkipped { variable, missing } => write!(
                f,
                "{} skipped, it does not vary along {}",
                pretty_name(variable),
                missing.join(", ")
            ),
        }
    }
}
