//! Embedding chart specs into reproducible code cells
//!
//! A saved chart becomes a `vega` cell whose source is the spec with its data
//! replaced by an expression that re-derives the plotted rows from the
//! notebook value, e.g. `df.aggregate(["region"], [{"price":"mean"}])`.

use crate::table::{table_ops, TableOp};
use crate::{naming, ChartConfig, PlotError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Language tag of saved chart cells
pub const CELL_LANGUAGE: &str = "vega";

/// Source of a notebook code cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSource {
    pub language: String,
    pub content: String,
}

/// Expression that re-derives the plotted rows from `stream_name`
pub fn stream_expression(stream_name: &str, ops: &[TableOp]) -> Result<String> {
    let mut expression = stream_name.to_string();
    for op in ops {
        match op {
            TableOp::GroupAgg {
                columns,
                aggregations,
            } => {
                let agg_specs: Vec<Value> = aggregations
                    .iter()
                    .map(|(field, agg)| {
                        let mut spec = Map::new();
                        spec.insert(field.clone(), json!(agg.as_str()));
                        Value::Object(spec)
                    })
                    .collect();
                expression = format!(
                    "{}.aggregate({}, {})",
                    expression,
                    to_compact_json(columns)?,
                    to_compact_json(&agg_specs)?
                );
            }
        }
    }
    Ok(expression)
}

fn to_compact_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| PlotError::WriterError(format!("Failed to serialize stream expression: {}", e)))
}

/// Build the code cell for a synthesized chart.
///
/// `spec` is left untouched; the cell embeds a copy whose `data.values` is
/// the stream expression for `config`.
pub fn save_cell(spec: &Value, config: &ChartConfig, stream_name: &str) -> Result<CellSource> {
    let mut spec = spec.clone();
    if !spec.is_object() {
        return Err(PlotError::WriterError(
            "Chart spec must be a JSON object".to_string(),
        ));
    }
    spec["data"]["values"] = json!(naming::DATA_STREAM_PLACEHOLDER);

    let content = serde_json::to_string_pretty(&spec)
        .map_err(|e| PlotError::WriterError(format!("Failed to serialize chart spec: {}", e)))?;
    let ops = table_ops(config);
    let expression = stream_expression(stream_name, &ops)?;

    tracing::debug!(ops = ops.len(), stream = %expression, "Saving chart cell");

    let content = content.replacen(naming::QUOTED_DATA_STREAM_PLACEHOLDER, &expression, 1);
    Ok(CellSource {
        language: CELL_LANGUAGE.to_string(),
        content: format!("({})", content),
    })
}
