//! DataFrame → Vega-Lite row conversion
//!
//! Rows are emitted as JSON objects keyed by column name. Compound aggregate
//! columns (`quartiles(v).q1`, ...) are nested under their expression so the
//! spec can address them as `quartiles(v).q1` through Vega-Lite's nested
//! field access.

use crate::{naming, DataFrame, PlotError, Result};
use polars::prelude::*;
use serde_json::{json, Map, Value};

/// Convert a DataFrame to Vega-Lite data values (array of objects)
pub fn dataframe_to_values(df: &DataFrame) -> Result<Vec<Value>> {
    let columns = df.get_columns();
    let mut values = Vec::with_capacity(df.height());

    for row_idx in 0..df.height() {
        let mut row_obj = Map::new();

        for column in columns {
            let name = column.name().as_str();
            let value = series_value_at(column.as_materialized_series(), row_idx)?;

            match naming::split_sub_field(name) {
                Some((expression, stat)) => {
                    let nested = row_obj
                        .entry(expression.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(stats) = nested {
                        stats.insert(stat.to_string(), value);
                    }
                }
                None => {
                    row_obj.insert(name.to_string(), value);
                }
            }
        }

        values.push(Value::Object(row_obj));
    }

    Ok(values)
}

fn cast_error(series: &Series, e: PolarsError) -> PlotError {
    PlotError::ReaderError(format!(
        "Failed to read column '{}' as {}: {}",
        series.name(),
        series.dtype(),
        e
    ))
}

/// Get a single value from a series at a given index as JSON Value
pub fn series_value_at(series: &Series, idx: usize) -> Result<Value> {
    use DataType::*;

    let err = |e| cast_error(series, e);

    let value = match series.dtype() {
        Int8 => series.i8().map_err(err)?.get(idx).map(|v| json!(v)),
        Int16 => series.i16().map_err(err)?.get(idx).map(|v| json!(v)),
        Int32 => series.i32().map_err(err)?.get(idx).map(|v| json!(v)),
        Int64 => series.i64().map_err(err)?.get(idx).map(|v| json!(v)),
        UInt8 => series.u8().map_err(err)?.get(idx).map(|v| json!(v)),
        UInt16 => series.u16().map_err(err)?.get(idx).map(|v| json!(v)),
        // Counts come back as UInt32
        UInt32 => series.u32().map_err(err)?.get(idx).map(|v| json!(v)),
        UInt64 => series.u64().map_err(err)?.get(idx).map(|v| json!(v)),
        Float32 => series
            .f32()
            .map_err(err)?
            .get(idx)
            .filter(|v| v.is_finite())
            .map(|v| json!(v)),
        Float64 => series
            .f64()
            .map_err(err)?
            .get(idx)
            .filter(|v| v.is_finite())
            .map(|v| json!(v)),
        Boolean => series.bool().map_err(err)?.get(idx).map(|v| json!(v)),
        String => series.str().map_err(err)?.get(idx).map(|v| json!(v)),
        Date => {
            // Days since epoch → "YYYY-MM-DD"
            let ca = series.date().map_err(err)?;
            ca.physical()
                .get(idx)
                .and_then(|days| {
                    chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
                        .map(|epoch| epoch + chrono::Duration::days(days as i64))
                })
                .map(|date| json!(date.format("%Y-%m-%d").to_string()))
        }
        Datetime(time_unit, _) => {
            // Timestamp → "YYYY-MM-DDTHH:MM:SS.sssZ"
            let ca = series.datetime().map_err(err)?;
            ca.physical()
                .get(idx)
                .map(|timestamp| match time_unit {
                    TimeUnit::Microseconds => timestamp,
                    TimeUnit::Milliseconds => timestamp * 1_000,
                    TimeUnit::Nanoseconds => timestamp / 1_000,
                })
                .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_micros)
                .map(|dt| json!(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()))
        }
        _ => {
            // Fallback: convert to string
            let value = series.get(idx).map_err(err)?;
            (!value.is_null()).then(|| json!(value.to_string()))
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_rows() {
        let df = df! {
            "region" => &["north", "south"],
            "units" => &[1i64, 2],
            "flag" => &[true, false],
        }
        .unwrap();

        let values = dataframe_to_values(&df).unwrap();
        assert_eq!(
            values,
            vec![
                json!({"region": "north", "units": 1, "flag": true}),
                json!({"region": "south", "units": 2, "flag": false}),
            ]
        );
    }

    #[test]
    fn test_compound_columns_are_nested() {
        let df = df! {
            "g" => &["a"],
            "quartiles(v).min" => &[1.0f64],
            "quartiles(v).median" => &[3.0f64],
            "count(v)" => &[5u32],
            "plain.dotted" => &[7i32],
            "price(usd).eur" => &[2i32],
        }
        .unwrap();

        let values = dataframe_to_values(&df).unwrap();
        assert_eq!(
            values[0],
            json!({
                "g": "a",
                "quartiles(v)": {"min": 1.0, "median": 3.0},
                "count(v)": 5,
                "plain.dotted": 7,
                "price(usd).eur": 2
            })
        );
    }

    #[test]
    fn test_nulls_and_nan() {
        let df = df! {
            "a" => &[Some(1.5f64), None, Some(f64::NAN)],
            "b" => &[Some("x"), Some("y"), None],
        }
        .unwrap();

        let values = dataframe_to_values(&df).unwrap();
        assert_eq!(values[0], json!({"a": 1.5, "b": "x"}));
        assert_eq!(values[1], json!({"a": null, "b": "y"}));
        assert_eq!(values[2], json!({"a": null, "b": null}));
    }

    #[test]
    fn test_temporal_values() {
        let dates = Series::new("d".into(), &[19723i32])
            .cast(&DataType::Date)
            .unwrap();
        assert_eq!(series_value_at(&dates, 0).unwrap(), json!("2024-01-01"));

        let stamps = Series::new("t".into(), &[1_704_067_200_000i64])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        assert_eq!(
            series_value_at(&stamps, 0).unwrap(),
            json!("2024-01-01T00:00:00.000Z")
        );
    }
}
