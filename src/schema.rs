//! Field schema and field-typing helpers
//!
//! Fields come from an external table schema: a name plus a primitive type
//! tag. The plot editor sorts them into roles (dimension, measure, numeric)
//! and picks a Vega-Lite encoding type for anything placed on an axis.

use crate::DataFrame;
use polars::prelude::DataType as PolarsType;
use serde::{Deserialize, Serialize};

/// Primitive type tag of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Byte,
    Bool,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Date,
    Timestamp,
    Binary,
    /// Any column type the editor cannot plot
    Other,
}

impl DataType {
    /// Byte, Short, Int, Long, Float or Double
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::Short
                | DataType::Int
                | DataType::Long
                | DataType::Float
                | DataType::Double
        )
    }

    /// Whether columns of this type can be placed on the x-axis as a dimension
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::Bool
                | DataType::Short
                | DataType::Int
                | DataType::Long
                | DataType::String
                | DataType::Date
                | DataType::Timestamp
        )
    }

    /// Map a polars column type onto the editor's type tags
    pub fn from_polars(dtype: &PolarsType) -> Self {
        match dtype {
            PolarsType::Int8 => DataType::Byte,
            PolarsType::Boolean => DataType::Bool,
            PolarsType::Int16 | PolarsType::UInt8 => DataType::Short,
            PolarsType::Int32 | PolarsType::UInt16 => DataType::Int,
            PolarsType::Int64 | PolarsType::UInt32 | PolarsType::UInt64 => DataType::Long,
            PolarsType::Float32 => DataType::Float,
            PolarsType::Float64 => DataType::Double,
            PolarsType::String => DataType::String,
            PolarsType::Date => DataType::Date,
            PolarsType::Datetime(_, _) => DataType::Timestamp,
            PolarsType::Binary => DataType::Binary,
            _ => DataType::Other,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DataType::Byte => "byte",
            DataType::Bool => "bool",
            DataType::Short => "short",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::Binary => "binary",
            DataType::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// Vega-Lite encoding type for a positional or color channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingType {
    Nominal,
    Ordinal,
    Quantitative,
}

impl EncodingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingType::Nominal => "nominal",
            EncodingType::Ordinal => "ordinal",
            EncodingType::Quantitative => "quantitative",
        }
    }
}

impl std::fmt::Display for EncodingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encoding type used when a field is bound to an axis or color channel.
///
/// String and Bool are nominal, Double is quantitative, every other type is
/// ordinal.
pub fn dimension_type(data_type: DataType) -> EncodingType {
    match data_type {
        DataType::String | DataType::Bool => EncodingType::Nominal,
        DataType::Double => EncodingType::Quantitative,
        _ => EncodingType::Ordinal,
    }
}

/// Role a field plays when dragged onto a drop zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// Groupable field for the x-axis
    Dimension,
    /// Numeric field paired with an aggregate
    Measure,
    /// Raw numeric field, plotted without aggregation
    Numeric,
}

impl std::fmt::Display for FieldRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FieldRole::Dimension => "dimension",
            FieldRole::Measure => "measure",
            FieldRole::Numeric => "numeric",
        };
        write!(f, "{}", s)
    }
}

/// A named, typed column of the plotted table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    pub fn is_dimension(&self) -> bool {
        self.data_type.is_dimension()
    }

    /// Measure candidates are exactly the numeric fields
    pub fn is_measure(&self) -> bool {
        self.data_type.is_numeric()
    }

    pub fn is_numeric(&self) -> bool {
        self.data_type.is_numeric()
    }

    /// Whether this field may be dropped where `role` is expected
    pub fn has_role(&self, role: FieldRole) -> bool {
        match role {
            FieldRole::Dimension => self.is_dimension(),
            FieldRole::Measure => self.is_measure(),
            FieldRole::Numeric => self.is_numeric(),
        }
    }

    pub fn encoding_type(&self) -> EncodingType {
        dimension_type(self.data_type)
    }
}

/// Ordered list of fields of a table
pub type Schema = Vec<Field>;

/// Extract the field list of a DataFrame
pub fn schema_of(df: &DataFrame) -> Schema {
    df.get_columns()
        .iter()
        .map(|column| Field::new(column.name().as_str(), DataType::from_polars(column.dtype())))
        .collect()
}

/// Look up a field by name
pub fn find_field<'a>(schema: &'a [Field], name: &str) -> Option<&'a Field> {
    schema.iter().find(|field| field.name == name)
}

/// Fields usable as x-axis dimensions
pub fn dimensions(schema: &[Field]) -> Vec<&Field> {
    schema.iter().filter(|f| f.is_dimension()).collect()
}

/// Fields usable as aggregated y-axis measures
pub fn measures(schema: &[Field]) -> Vec<&Field> {
    schema.iter().filter(|f| f.is_measure()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{df, NamedFrom};

    const ALL_TYPES: [DataType; 12] = [
        DataType::Byte,
        DataType::Bool,
        DataType::Short,
        DataType::Int,
        DataType::Long,
        DataType::Float,
        DataType::Double,
        DataType::String,
        DataType::Date,
        DataType::Timestamp,
        DataType::Binary,
        DataType::Other,
    ];

    #[test]
    fn test_dimension_classification() {
        let dims: Vec<_> = ALL_TYPES.iter().filter(|t| t.is_dimension()).collect();
        assert_eq!(
            dims,
            vec![
                &DataType::Byte,
                &DataType::Bool,
                &DataType::Short,
                &DataType::Int,
                &DataType::Long,
                &DataType::String,
                &DataType::Date,
                &DataType::Timestamp,
            ]
        );
    }

    #[test]
    fn test_measure_classification() {
        let numeric: Vec<_> = ALL_TYPES.iter().filter(|t| t.is_numeric()).collect();
        assert_eq!(
            numeric,
            vec![
                &DataType::Byte,
                &DataType::Short,
                &DataType::Int,
                &DataType::Long,
                &DataType::Float,
                &DataType::Double,
            ]
        );
    }

    #[test]
    fn test_dimension_type_is_total_over_dimensions() {
        for dt in ALL_TYPES.iter().filter(|t| t.is_dimension()) {
            let expected = match dt {
                DataType::String | DataType::Bool => EncodingType::Nominal,
                _ => EncodingType::Ordinal,
            };
            assert_eq!(dimension_type(*dt), expected, "type {}", dt);
        }
        assert_eq!(dimension_type(DataType::Double), EncodingType::Quantitative);
        assert_eq!(dimension_type(DataType::Float), EncodingType::Ordinal);
    }

    #[test]
    fn test_field_roles() {
        let name = Field::new("name", DataType::String);
        let price = Field::new("price", DataType::Double);
        let qty = Field::new("qty", DataType::Int);

        assert!(name.has_role(FieldRole::Dimension));
        assert!(!name.has_role(FieldRole::Measure));
        assert!(!price.has_role(FieldRole::Dimension));
        assert!(price.has_role(FieldRole::Measure));
        assert!(price.has_role(FieldRole::Numeric));
        assert!(qty.has_role(FieldRole::Dimension));
        assert!(qty.has_role(FieldRole::Measure));
    }

    #[test]
    fn test_schema_of_dataframe() {
        let df = df! {
            "region" => &["north", "south"],
            "units" => &[1i32, 2],
            "price" => &[1.5f64, 2.5],
            "flag" => &[true, false],
            "small" => &[1i8, 2],
        }
        .unwrap();

        let schema = schema_of(&df);
        assert_eq!(
            schema,
            vec![
                Field::new("region", DataType::String),
                Field::new("units", DataType::Int),
                Field::new("price", DataType::Double),
                Field::new("flag", DataType::Bool),
                Field::new("small", DataType::Byte),
            ]
        );

        let dims: Vec<&str> = dimensions(&schema).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(dims, vec!["region", "units", "flag", "small"]);
        let meas: Vec<&str> = measures(&schema).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(meas, vec!["units", "price", "small"]);
        assert_eq!(find_field(&schema, "price").map(|f| f.data_type), Some(DataType::Double));
        assert!(find_field(&schema, "missing").is_none());
    }

    #[test]
    fn test_field_serde_uses_data_type_key() {
        let field = Field::new("a", DataType::Timestamp);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json, serde_json::json!({"name": "a", "dataType": "timestamp"}));
    }
}
