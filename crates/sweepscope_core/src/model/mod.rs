mod dataset;
mod ids;
mod role;
mod selection;

pub use dataset::{AxisSummary, Coord, Dataset, DatasetSummary, Variable, VariableSummary};
pub use ids::DimId;
pub use role::{ParseRoleError, Role};
pub use selection::{LayoutConfig, PlotSelection};
