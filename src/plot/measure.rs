//! Y-axis measure selections

use super::{Aggregate, ChartKind};
use crate::naming;
use crate::schema::Field;
use serde::{Deserialize, Serialize};

/// A numeric field placed on the y-axis, with the aggregate chosen for it.
///
/// Raw-field charts (scatter plots) bind the field directly and carry no
/// aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub field: Field,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agg: Option<Aggregate>,
}

impl Measure {
    pub fn new(field: Field, agg: Aggregate) -> Self {
        Self {
            field,
            agg: Some(agg),
        }
    }

    /// A measure bound to the raw field values
    pub fn raw(field: Field) -> Self {
        Self { field, agg: None }
    }

    /// Column name this measure is plotted from: `agg(field)`, or the bare
    /// field name when unaggregated
    pub fn expression(&self) -> String {
        match self.agg {
            Some(agg) => naming::aggregate_expression(agg.as_str(), &self.field.name),
            None => self.field.name.clone(),
        }
    }

    /// The same field in the measure mode of a chart kind.
    ///
    /// Raw-field kinds drop the aggregate; aggregated kinds give a raw
    /// measure the default aggregate.
    pub fn for_kind(&self, kind: &ChartKind) -> Measure {
        if kind.traits().raw_fields {
            Measure::raw(self.field.clone())
        } else {
            Measure::new(self.field.clone(), self.agg.unwrap_or_default())
        }
    }

    pub fn is_compound(&self) -> bool {
        self.agg.is_some_and(|agg| agg.is_compound())
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression())
    }
}
