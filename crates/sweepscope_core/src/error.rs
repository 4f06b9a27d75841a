use thiserror::Error;

use crate::model::DimId;

/// Errors raised while assembling a [`Dataset`](crate::model::Dataset)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("axis `{0}` is declared twice")]
    DuplicateAxis(String),
    #[error("axis `{0}` has no coordinate values")]
    EmptyAxis(String),
    #[error("variable `{0}` is declared twice")]
    DuplicateVariable(String),
    #[error("variable `{variable}` references unknown axis `{axis}`")]
    UnknownAxis { variable: String, axis: String },
    #[error("variable `{variable}` lists axis `{axis}` more than once")]
    RepeatedAxis { variable: String, axis: String },
    #[error("variable `{variable}` has {actual} values, shape {shape:?} needs {expected}")]
    ShapeMismatch {
        variable: String,
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// Errors from the axis-role assignment engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("dimension {0:?} does not exist")]
    UnknownDimension(DimId),
    #[error("index {index} is out of range for dimension `{dimension}` of size {size}")]
    IndexOutOfRange {
        dimension: String,
        index: usize,
        size: usize,
    },
}

/// Errors from sweep group manipulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
    #[error("sweep group {0} does not exist")]
    UnknownGroup(usize),
    #[error("`{name}` is not a member of sweep group {group}")]
    InvalidMember { group: usize, name: String },
}

/// Reasons the `parallel_sweep_axes` metadata field was rejected.
///
/// Never surfaced as a failure: the grouping falls back to one group per axis
/// and keeps the reason around so it can be reported as a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepMetadataError {
    #[error("not a JSON object of axis lists: {0}")]
    Json(String),
    #[error("group key `{0}` is not an integer")]
    BadKey(String),
    #[error("group key {0} appears twice")]
    DuplicateKey(usize),
    #[error("group {0} has no members")]
    EmptyGroup(usize),
    #[error("group {group} names unknown axis `{axis}`")]
    UnknownAxis { group: usize, axis: String },
    #[error("axis `{0}` belongs to more than one group")]
    AxisInTwoGroups(String),
    #[error("group {group} mixes sizes: `{axis}` has {actual} points, expected {expected}")]
    SizeMismatch {
        group: usize,
        axis: String,
        expected: usize,
        actual: usize,
    },
    #[error("variable `{variable}` is indexed by two members of group {group}")]
    VariableSpansGroup { variable: String, group: usize },
}

/// Errors from the reduction pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    #[error("variable `{0}` does not exist")]
    UnknownVariable(String),
    #[error("index {index} is out of range for axis `{axis}` of size {size}")]
    IndexOutOfRange {
        axis: String,
        index: usize,
        size: usize,
    },
    #[error("variable `{variable}` cannot be laid out as {expected:?}")]
    Orientation {
        variable: String,
        expected: Vec<String>,
    },
}

/// Errors returned by the operator action surface of a
/// [`RunSession`](crate::session::RunSession)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("dimension `{0}` is not part of this run")]
    UnknownDimension(String),
    #[error("result `{0}` is not part of this run")]
    UnknownVariable(String),
    #[error("columns per row must be positive")]
    InvalidColumns,
    #[error(transparent)]
    Assign(#[from] AssignError),
    #[error(transparent)]
    Sweep(#[from] SweepError),
    #[error(transparent)]
    Reduce(#[from] ReduceError),
}

impl SessionError {
    /// Whether this error means the caller broke the engine contract
    /// (a well-built UI cannot produce these).
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            SessionError::Assign(AssignError::IndexOutOfRange { .. })
                | SessionError::Sweep(SweepError::InvalidMember { .. })
        )
    }
}
