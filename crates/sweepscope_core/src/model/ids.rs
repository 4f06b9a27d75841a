//! Identifiers for session entities

use serde::{Deserialize, Serialize};

/// Position of a logical dimension (one per sweep group) within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimId(pub usize);
