//! Table operations derived from a chart configuration
//!
//! Aggregated charts do not plot raw rows. The editor asks the data source for
//! a pre-aggregated table instead: one row per x-axis group, with a column per
//! measure expression. [`table_ops`] describes that request and [`aggregate`]
//! executes it against an in-memory DataFrame.

use crate::plot::Aggregate;
use crate::{naming, ChartConfig, DataFrame, PlotError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An operation applied to the plotted table before rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TableOp {
    /// Group by `columns` and compute one aggregate per `(field, agg)` pair
    GroupAgg {
        columns: Vec<String>,
        aggregations: Vec<(String, Aggregate)>,
    },
}

/// Table operations needed to produce the rows a configuration plots.
///
/// Raw-field charts read the table as-is. Otherwise, once an x-field and at
/// least one measure are set, every configured measure is aggregated per
/// x-axis group; measures added without an aggregate use the default one.
pub fn table_ops(config: &ChartConfig) -> Vec<TableOp> {
    if config.raw_fields() {
        return Vec::new();
    }

    match &config.x_field {
        Some(x) if !config.y_measures.is_empty() => vec![TableOp::GroupAgg {
            columns: vec![x.name.clone()],
            aggregations: config
                .plotted_measures()
                .into_iter()
                .map(|m| (m.field.name, m.agg.unwrap_or_default()))
                .collect(),
        }],
        _ => Vec::new(),
    }
}

/// Execute a table operation with polars.
///
/// `GroupAgg` keeps groups in order of first appearance and names each
/// output column after its measure expression; `quartiles` expands into the
/// six `quartiles(field).<stat>` columns.
pub fn aggregate(df: &DataFrame, op: &TableOp) -> Result<DataFrame> {
    match op {
        TableOp::GroupAgg {
            columns,
            aggregations,
        } => {
            let keys: Vec<Expr> = columns.iter().map(|c| col(c.as_str())).collect();

            // Repeated measures would produce duplicate output columns
            let mut seen = HashSet::new();
            let exprs: Vec<Expr> = aggregations
                .iter()
                .filter(|(field, agg)| seen.insert((field.as_str(), *agg)))
                .flat_map(|(field, agg)| aggregate_exprs(field, *agg))
                .collect();

            tracing::debug!(
                columns = ?columns,
                outputs = exprs.len(),
                rows = df.height(),
                "Aggregating table"
            );

            df.clone()
                .lazy()
                .group_by_stable(keys)
                .agg(exprs)
                .collect()
                .map_err(|e| {
                    PlotError::ReaderError(format!(
                        "Failed to aggregate by {}: {}",
                        columns.join(", "),
                        e
                    ))
                })
        }
    }
}

/// Apply every table operation in order
pub fn apply_table_ops(df: &DataFrame, ops: &[TableOp]) -> Result<DataFrame> {
    ops.iter()
        .try_fold(df.clone(), |current, op| aggregate(&current, op))
}

fn aggregate_exprs(field: &str, agg: Aggregate) -> Vec<Expr> {
    let expression = naming::aggregate_expression(agg.as_str(), field);
    match agg {
        Aggregate::Mean => vec![col(field).mean().alias(expression)],
        Aggregate::Count => vec![col(field).count().alias(expression)],
        Aggregate::Quartiles => {
            let stat = |name: &str| naming::sub_field(&expression, name);
            vec![
                col(field).min().alias(stat("min")),
                col(field)
                    .quantile(lit(0.25), QuantileMethod::Linear)
                    .alias(stat("q1")),
                col(field).median().alias(stat("median")),
                col(field)
                    .quantile(lit(0.75), QuantileMethod::Linear)
                    .alias(stat("q3")),
                col(field).max().alias(stat("max")),
                col(field).mean().alias(stat("mean")),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::{ChartKind, Measure};
    use crate::schema::{DataType as FieldType, Field};

    fn sales() -> DataFrame {
        df! {
            "region" => &["north", "south", "north", "south", "east"],
            "price" => &[1.0f64, 2.0, 3.0, 6.0, 5.0],
            "qty" => &[10i64, 20, 30, 40, 50],
        }
        .unwrap()
    }

    fn column_f64(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect()
    }

    #[test]
    fn test_table_ops_group_agg() {
        let config = ChartConfig::new(ChartKind::Bar)
            .with_x_field(Field::new("region", FieldType::String))
            .with_measure(Measure::new(Field::new("price", FieldType::Double), Aggregate::Mean))
            .with_measure(Measure::new(Field::new("qty", FieldType::Long), Aggregate::Count));

        assert_eq!(
            table_ops(&config),
            vec![TableOp::GroupAgg {
                columns: vec!["region".to_string()],
                aggregations: vec![
                    ("price".to_string(), Aggregate::Mean),
                    ("qty".to_string(), Aggregate::Count)
                ],
            }]
        );
    }

    #[test]
    fn test_table_ops_empty_cases() {
        // Raw fields are never aggregated
        let xy = ChartConfig::new(ChartKind::Xy)
            .with_x_field(Field::new("price", FieldType::Double))
            .with_measure(Measure::raw(Field::new("qty", FieldType::Long)));
        assert!(table_ops(&xy).is_empty());

        let no_x = ChartConfig::new(ChartKind::Bar)
            .with_measure(Measure::new(Field::new("price", FieldType::Double), Aggregate::Mean));
        assert!(table_ops(&no_x).is_empty());

        let no_measures =
            ChartConfig::new(ChartKind::Bar).with_x_field(Field::new("region", FieldType::String));
        assert!(table_ops(&no_measures).is_empty());
    }

    #[test]
    fn test_table_ops_after_leaving_xy() {
        let mut config = ChartConfig::new(ChartKind::Xy);
        config.set_x_field(Field::new("qty", FieldType::Long)).unwrap();
        config.add_y_field(Field::new("price", FieldType::Double), None).unwrap();
        config.set_kind(ChartKind::Bar);

        let ops = table_ops(&config);
        assert_eq!(
            ops,
            vec![TableOp::GroupAgg {
                columns: vec!["qty".to_string()],
                aggregations: vec![("price".to_string(), Aggregate::Mean)],
            }]
        );

        let result = apply_table_ops(&sales(), &ops).unwrap();
        assert!(result.column("mean(price)").is_ok());
    }

    #[test]
    fn test_aggregate_mean_and_count() {
        let op = TableOp::GroupAgg {
            columns: vec!["region".into()],
            aggregations: vec![("price".into(), Aggregate::Mean), ("qty".into(), Aggregate::Count)],
        };
        let result = aggregate(&sales(), &op).unwrap();

        assert_eq!(result.height(), 3);
        let names: Vec<&str> = result.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["region", "mean(price)", "count(qty)"]);

        let regions: Vec<Option<&str>> = result
            .column("region")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(regions, vec![Some("north"), Some("south"), Some("east")]);
        assert_eq!(column_f64(&result, "mean(price)"), vec![Some(2.0), Some(4.0), Some(5.0)]);
        assert_eq!(column_f64(&result, "count(qty)"), vec![Some(2.0), Some(2.0), Some(1.0)]);
    }

    #[test]
    fn test_aggregate_quartiles() {
        let df = df! {
            "g" => &["a", "a", "a", "a", "a"],
            "v" => &[5.0f64, 1.0, 4.0, 2.0, 3.0],
        }
        .unwrap();
        let op = TableOp::GroupAgg {
            columns: vec!["g".into()],
            aggregations: vec![("v".into(), Aggregate::Quartiles)],
        };
        let result = aggregate(&df, &op).unwrap();

        let names: Vec<&str> = result.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "g",
                "quartiles(v).min",
                "quartiles(v).q1",
                "quartiles(v).median",
                "quartiles(v).q3",
                "quartiles(v).max",
                "quartiles(v).mean",
            ]
        );
        let stats: Vec<f64> = names[1..]
            .iter()
            .map(|name| column_f64(&result, name)[0].unwrap())
            .collect();
        assert_eq!(stats, vec![1.0, 2.0, 3.0, 4.0, 5.0, 3.0]);
    }

    #[test]
    fn test_aggregate_skips_repeated_measures() {
        let op = TableOp::GroupAgg {
            columns: vec!["region".into()],
            aggregations: vec![("price".into(), Aggregate::Mean), ("price".into(), Aggregate::Mean)],
        };
        let result = aggregate(&sales(), &op).unwrap();
        assert_eq!(result.width(), 2);
    }

    #[test]
    fn test_aggregate_missing_column() {
        let op = TableOp::GroupAgg {
            columns: vec!["nope".into()],
            aggregations: vec![("price".into(), Aggregate::Mean)],
        };
        assert!(matches!(
            aggregate(&sales(), &op),
            Err(PlotError::ReaderError(_))
        ));
    }

    #[test]
    fn test_apply_table_ops() {
        let df = sales();
        assert_eq!(apply_table_ops(&df, &[]).unwrap(), df);

        let ops = vec![TableOp::GroupAgg {
            columns: vec!["region".into()],
            aggregations: vec![("qty".into(), Aggregate::Mean)],
        }];
        assert_eq!(apply_table_ops(&df, &ops).unwrap().height(), 3);
    }

    #[test]
    fn test_table_op_serde() {
        let op = TableOp::GroupAgg {
            columns: vec!["x".into()],
            aggregations: vec![("a".into(), Aggregate::Quartiles)],
        };
        assert_eq!(
            serde_json::to_value(&op).unwrap(),
            serde_json::json!({"op": "groupAgg", "columns": ["x"], "aggregations": [["a", "quartiles"]]})
        );
    }
}
