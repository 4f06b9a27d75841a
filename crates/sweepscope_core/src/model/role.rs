use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Display role of a logical dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Mean-reduced and dropped
    Average,
    /// Pinned to a single index and dropped
    FixedIndex,
    /// Kept as the plot x-axis (unique)
    XAxis,
    /// Kept as the plot y-axis (unique)
    YAxis,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Average, Role::FixedIndex, Role::YAxis, Role::XAxis];

    /// Roles that at most one dimension may hold
    pub fn is_plot_axis(self) -> bool {
        matches!(self, Role::XAxis | Role::YAxis)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Average => "average",
            Role::FixedIndex => "select value",
            Role::XAxis => "x-axis",
            Role::YAxis => "y-axis",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}` (expected average, fixed, x or y)")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "average" | "avg" | "mean" => Ok(Role::Average),
            "fixed" | "fixed-index" | "select-value" | "select" => Ok(Role::FixedIndex),
            "x" | "x-axis" => Ok(Role::XAxis),
            "y" | "y-axis" => Ok(Role::YAxis),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_aliases() {
        assert_eq!("x".parse::<Role>(), Ok(Role::XAxis));
        assert_eq!("Y-Axis".parse::<Role>(), Ok(Role::YAxis));
        assert_eq!("select_value".parse::<Role>(), Ok(Role::FixedIndex));
        assert_eq!("avg".parse::<Role>(), Ok(Role::Average));
        assert!("z".parse::<Role>().is_err());
    }
}
