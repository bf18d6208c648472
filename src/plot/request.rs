//! Name-only chart descriptions resolved against a table schema
//!
//! A `ChartRequest` is what a user writes down: column names and measure
//! expressions such as `mean(price)`. Resolving it against the schema of the
//! plotted table produces a typed [`ChartConfig`], going through the same
//! drop-zone checks as the interactive editor.

use super::{Aggregate, ChartConfig, ChartKind};
use crate::schema::{find_field, Field};
use crate::{naming, PlotError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative chart description, usually loaded from a JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartRequest {
    pub kind: Option<ChartKind>,
    /// Column for the x-axis
    pub x: Option<String>,
    /// Measure expressions: `agg(column)` or a bare column name
    pub y: Vec<String>,
    pub x_title: Option<String>,
    pub y_title: Option<String>,
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Name of the data source the chart reads from
    pub name: Option<String>,
}

impl ChartRequest {
    /// Parse a request from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| PlotError::ConfigError(format!("Invalid chart request: {}", e)))
    }

    /// Load a request from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PlotError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    /// Layer `overrides` on top of this request.
    ///
    /// Set values in `overrides` win; a non-empty measure list replaces the
    /// whole list.
    pub fn merge(self, overrides: ChartRequest) -> Self {
        Self {
            kind: overrides.kind.or(self.kind),
            x: overrides.x.or(self.x),
            y: if overrides.y.is_empty() {
                self.y
            } else {
                overrides.y
            },
            x_title: overrides.x_title.or(self.x_title),
            y_title: overrides.y_title.or(self.y_title),
            title: overrides.title.or(self.title),
            width: overrides.width.or(self.width),
            height: overrides.height.or(self.height),
            name: overrides.name.or(self.name),
        }
    }

    /// Resolve column names against `schema` into a chart configuration
    pub fn resolve(&self, schema: &[Field]) -> Result<ChartConfig> {
        let mut config = ChartConfig::new(self.kind.clone().unwrap_or_default());

        if let Some(x) = &self.x {
            config.set_x_field(lookup(schema, x)?)?;
        }

        for expression in &self.y {
            let (field, agg) = resolve_measure(schema, expression)?;
            config.add_y_field(field, agg)?;
        }

        if let Some(title) = &self.x_title {
            config.x_axis_title = title.clone();
        }
        if let Some(title) = &self.y_title {
            config.y_axis_title = title.clone();
        }
        if let Some(title) = &self.title {
            config.plot_title = title.clone();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }

        Ok(config)
    }
}

/// Split a measure expression into its column name and aggregate.
///
/// `mean(price)` yields `("price", Some(Mean))`, a bare `price` yields
/// `("price", None)`.
pub fn parse_measure(expression: &str) -> Result<(&str, Option<Aggregate>)> {
    let expression = expression.trim();
    if expression.is_empty() {
        return Err(PlotError::ConfigError(
            "Measure expression cannot be empty".to_string(),
        ));
    }
    match naming::split_aggregate_expression(expression) {
        Some((agg, field)) => Ok((field, Some(agg.parse()?))),
        None => Ok((expression, None)),
    }
}

/// Resolve a measure expression against `schema`.
///
/// An expression that exactly names a column is that bare column, so
/// columns such as `f(x)` stay addressable.
fn resolve_measure(schema: &[Field], expression: &str) -> Result<(Field, Option<Aggregate>)> {
    if let Some(field) = find_field(schema, expression.trim()) {
        return Ok((field.clone(), None));
    }
    let (name, agg) = parse_measure(expression)?;
    Ok((lookup(schema, name)?, agg))
}

fn lookup(schema: &[Field], name: &str) -> Result<Field> {
    find_field(schema, name).cloned().ok_or_else(|| {
        let available: Vec<&str> = schema.iter().map(|f| f.name.as_str()).collect();
        PlotError::ConfigError(format!(
            "Column '{}' does not exist.\nAvailable columns: {}",
            name,
            available.join(", ")
        ))
    })
}
