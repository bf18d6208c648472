//! Aggregate functions a measure can be summarized with

use crate::{naming, PlotError};
use serde::{Deserialize, Serialize};

/// Aggregate applied to a measure per x-axis group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    #[default]
    Mean,
    Count,
    /// Compound aggregate expanding to min, q1, median, q3, max and mean
    Quartiles,
}

impl Aggregate {
    /// Every aggregate, in the order the editor lists them
    pub const ALL: &'static [Aggregate] = &[Aggregate::Mean, Aggregate::Count, Aggregate::Quartiles];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Mean => "mean",
            Aggregate::Count => "count",
            Aggregate::Quartiles => naming::QUARTILES,
        }
    }

    /// Whether the aggregated column is a record of several statistics
    pub fn is_compound(&self) -> bool {
        matches!(self, Aggregate::Quartiles)
    }

    /// Statistics nested under a compound aggregate column
    pub fn sub_fields(&self) -> &'static [&'static str] {
        match self {
            Aggregate::Quartiles => &naming::QUARTILE_STATS,
            _ => &[],
        }
    }
}

impl std::fmt::Display for Aggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Aggregate {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(Aggregate::Mean),
            "count" => Ok(Aggregate::Count),
            "quartiles" => Ok(Aggregate::Quartiles),
            other => Err(PlotError::ConfigError(format!(
                "Unknown aggregate '{}'. Expected one of: mean, count, quartiles",
                other
            ))),
        }
    }
}
