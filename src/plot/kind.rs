//! Chart kinds and their synthesis metadata
//!
//! Each kind carries the rules the editor applies to its measures: whether
//! measures are raw numeric fields, which aggregates may be selected, and
//! whether only a single measure is plotted. Kinds without bespoke synthesis
//! are represented by [`ChartKind::Other`], named after the Vega-Lite mark
//! they draw.

use super::Aggregate;
use crate::schema::FieldRole;
use crate::PlotError;
use serde::{Deserialize, Serialize};

/// The chart kinds offered by the editor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    /// Scatter plot of two raw numeric fields
    Xy,
    Boxplot,
    /// Any other Vega-Lite mark, synthesized like a bar chart
    Other(String),
}

/// Synthesis metadata for a chart kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTraits {
    /// Measures are raw numeric fields, not aggregate selections
    pub raw_fields: bool,
    /// Whitelist of aggregates that survive synthesis
    pub allowed_aggregates: Option<&'static [Aggregate]>,
    /// Every aggregate may be selected, including compound ones
    pub all_aggregates: bool,
    /// Only the first surviving measure is plotted
    pub single_measure: bool,
}

const DEFAULT_TRAITS: KindTraits = KindTraits {
    raw_fields: false,
    allowed_aggregates: None,
    all_aggregates: false,
    single_measure: false,
};

/// Aggregates offered for kinds without their own rules; quartiles need a
/// dedicated layout so they are hidden.
const DEFAULT_AGGREGATES: &[Aggregate] = &[Aggregate::Mean, Aggregate::Count];

impl ChartKind {
    /// The kinds listed in the editor's plot-type selector
    pub const BUILTIN: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Xy,
        ChartKind::Boxplot,
    ];

    pub fn traits(&self) -> KindTraits {
        match self {
            ChartKind::Bar | ChartKind::Other(_) => DEFAULT_TRAITS,
            ChartKind::Line => KindTraits {
                all_aggregates: true,
                ..DEFAULT_TRAITS
            },
            ChartKind::Xy => KindTraits {
                raw_fields: true,
                single_measure: true,
                ..DEFAULT_TRAITS
            },
            ChartKind::Boxplot => KindTraits {
                allowed_aggregates: Some(&[Aggregate::Quartiles]),
                single_measure: true,
                ..DEFAULT_TRAITS
            },
        }
    }

    /// Vega-Lite mark drawn by single-mark charts of this kind
    pub fn mark(&self) -> &str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Xy => "point",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Other(mark) => mark,
        }
    }

    /// Aggregates the measure selector offers for this kind
    pub fn selectable_aggregates(&self) -> &'static [Aggregate] {
        let traits = self.traits();
        if traits.raw_fields {
            &[]
        } else if let Some(allowed) = traits.allowed_aggregates {
            allowed
        } else if traits.all_aggregates {
            Aggregate::ALL
        } else {
            DEFAULT_AGGREGATES
        }
    }

    /// Whether a measure with this aggregate survives synthesis.
    ///
    /// Only an explicit whitelist filters; the selector hides the rest.
    pub fn allows(&self, agg: Option<Aggregate>) -> bool {
        match (self.traits().allowed_aggregates, agg) {
            (None, _) => true,
            (Some(allowed), Some(agg)) => allowed.contains(&agg),
            (Some(_), None) => false,
        }
    }

    /// Field role accepted by the x-axis drop zone
    pub fn x_role(&self) -> FieldRole {
        if self.traits().raw_fields {
            FieldRole::Numeric
        } else {
            FieldRole::Dimension
        }
    }

    /// Field role accepted by the y-axis drop zone
    pub fn y_role(&self) -> FieldRole {
        if self.traits().raw_fields {
            FieldRole::Numeric
        } else {
            FieldRole::Measure
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Xy => "xy",
            ChartKind::Boxplot => "boxplot",
            ChartKind::Other(mark) => mark.as_str(),
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for ChartKind {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            "xy" => Ok(ChartKind::Xy),
            "boxplot" => Ok(ChartKind::Boxplot),
            "" => Err(PlotError::ConfigError("Chart kind cannot be empty".to_string())),
            _ if name.chars().all(|c| c.is_ascii_alphabetic()) => Ok(ChartKind::Other(name)),
            _ => Err(PlotError::ConfigError(format!(
                "Invalid chart kind '{}': expected a mark name",
                s
            ))),
        }
    }
}

impl TryFrom<String> for ChartKind {
    type Error = PlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        kind.to_string()
    }
}
