//! Chart configuration edited by the plot editor
//!
//! The editor owns one `ChartConfig` while it is open and mutates it as
//! fields are dropped on the axes. Synthesis only ever borrows it.

use super::{Aggregate, ChartKind, Measure};
use crate::schema::{Field, FieldRole};
use crate::{PlotError, Result};
use serde::{Deserialize, Serialize};

/// Initial width of the editor's output area
pub const DEFAULT_WIDTH: u32 = 960;

/// Initial height of the editor's output area
pub const DEFAULT_HEIGHT: u32 = 480;

/// Editor state driving chart synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x_field: Option<Field>,
    #[serde(default)]
    pub y_measures: Vec<Measure>,
    #[serde(default)]
    pub x_axis_title: String,
    #[serde(default)]
    pub y_axis_title: String,
    #[serde(default)]
    pub plot_title: String,
    /// Width of the output area
    pub width: u32,
    /// Height of the output area
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new(ChartKind::default())
    }
}

impl ChartConfig {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            x_field: None,
            y_measures: Vec::new(),
            x_axis_title: String::new(),
            y_axis_title: String::new(),
            plot_title: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Builder method to bind the x-axis
    pub fn with_x_field(mut self, field: Field) -> Self {
        self.x_field = Some(field);
        self
    }

    /// Builder method to append a measure as-is
    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.y_measures.push(measure);
        self
    }

    /// Builder method to set the axis titles
    pub fn with_axis_titles(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_title = x.into();
        self.y_axis_title = y.into();
        self
    }

    /// Builder method to set the plot title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.plot_title = title.into();
        self
    }

    /// Builder method to set the output area size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Whether measures are raw numeric fields for the current kind
    pub fn raw_fields(&self) -> bool {
        self.kind.traits().raw_fields
    }

    /// Field role the x-axis drop zone accepts
    pub fn x_role(&self) -> FieldRole {
        self.kind.x_role()
    }

    /// Field role the y-axis drop zone accepts
    pub fn y_role(&self) -> FieldRole {
        self.kind.y_role()
    }

    pub fn accepts_x(&self, field: &Field) -> bool {
        field.has_role(self.x_role())
    }

    pub fn accepts_y(&self, field: &Field) -> bool {
        field.has_role(self.y_role())
    }

    /// Change the chart kind.
    ///
    /// Measures stay in the configuration as they were added; see
    /// [`ChartConfig::plotted_measures`] for how the new kind reads them.
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
    }

    /// Bind a field to the x-axis, replacing any previous binding
    pub fn set_x_field(&mut self, field: Field) -> Result<()> {
        if !self.accepts_x(&field) {
            return Err(PlotError::ValidationError(format!(
                "Field '{}' ({}) cannot be used as x-axis {} for {} charts",
                field.name,
                field.data_type,
                self.x_role(),
                self.kind
            )));
        }
        self.x_field = Some(field);
        Ok(())
    }

    /// Add a field to the y-axis.
    ///
    /// Raw-field kinds ignore `agg`; other kinds fall back to the default
    /// aggregate when none is given.
    pub fn add_y_field(&mut self, field: Field, agg: Option<Aggregate>) -> Result<()> {
        if !self.accepts_y(&field) {
            return Err(PlotError::ValidationError(format!(
                "Field '{}' ({}) cannot be used as y-axis {} for {} charts",
                field.name,
                field.data_type,
                self.y_role(),
                self.kind
            )));
        }
        let measure = if self.raw_fields() {
            Measure::raw(field)
        } else {
            Measure::new(field, agg.unwrap_or_default())
        };
        self.y_measures.push(measure);
        Ok(())
    }

    /// Remove the measure at `index`, returning it if present
    pub fn remove_y_measure(&mut self, index: usize) -> Option<Measure> {
        if index < self.y_measures.len() {
            Some(self.y_measures.remove(index))
        } else {
            None
        }
    }

    /// Every configured measure in the current kind's measure mode.
    ///
    /// Measures added under a different kind keep their field: raw-field
    /// kinds plot it unaggregated, aggregated kinds give raw measures the
    /// default aggregate.
    pub fn plotted_measures(&self) -> Vec<Measure> {
        self.y_measures
            .iter()
            .map(|m| m.for_kind(&self.kind))
            .collect()
    }

    /// Measures that survive the current kind's aggregate rules.
    ///
    /// Applies the aggregate whitelist to [`ChartConfig::plotted_measures`],
    /// fails if nothing is left, and keeps only the first survivor for
    /// single-measure kinds.
    pub fn usable_measures(&self) -> Result<Vec<Measure>> {
        let mut measures: Vec<Measure> = self
            .plotted_measures()
            .into_iter()
            .filter(|m| self.kind.allows(m.agg))
            .collect();

        if measures.is_empty() {
            return Err(PlotError::NoUsableMeasures(self.kind.clone()));
        }

        if self.kind.traits().single_measure && measures.len() > 1 {
            tracing::warn!(
                kind = %self.kind,
                dropped = measures.len() - 1,
                "{} charts plot a single measure; keeping {}",
                self.kind,
                measures[0]
            );
            measures.truncate(1);
        }

        Ok(measures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;

    fn region() -> Field {
        Field::new("region", DataType::String)
    }

    fn price() -> Field {
        Field::new("price", DataType::Double)
    }

    fn qty() -> Field {
        Field::new("qty", DataType::Int)
    }

    #[test]
    fn test_new_config_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.kind, ChartKind::Bar);
        assert!(config.x_field.is_none());
        assert!(config.y_measures.is_empty());
        assert_eq!((config.width, config.height), (960, 480));
    }

    #[test]
    fn test_set_x_field_checks_role() {
        let mut config = ChartConfig::new(ChartKind::Bar);
        assert!(config.set_x_field(region()).is_ok());
        assert_eq!(config.x_field, Some(region()));

        // Double is not a dimension
        assert!(config.set_x_field(price()).is_err());
        assert_eq!(config.x_field, Some(region()));

        // Scatter plots take raw numeric fields on both axes
        let mut xy = ChartConfig::new(ChartKind::Xy);
        assert!(xy.set_x_field(price()).is_ok());
        assert!(xy.set_x_field(region()).is_err());
    }

    #[test]
    fn test_add_y_field_aggregated() {
        let mut config = ChartConfig::new(ChartKind::Bar);
        config.add_y_field(price(), None).unwrap();
        config.add_y_field(qty(), Some(Aggregate::Count)).unwrap();
        assert_eq!(
            config.y_measures,
            vec![
                Measure::new(price(), Aggregate::Mean),
                Measure::new(qty(), Aggregate::Count)
            ]
        );
        assert!(config.add_y_field(region(), None).is_err());
    }

    #[test]
    fn test_add_y_field_raw() {
        let mut config = ChartConfig::new(ChartKind::Xy);
        config.add_y_field(price(), Some(Aggregate::Count)).unwrap();
        assert_eq!(config.y_measures, vec![Measure::raw(price())]);
    }

    #[test]
    fn test_remove_y_measure() {
        let mut config = ChartConfig::new(ChartKind::Line)
            .with_measure(Measure::new(price(), Aggregate::Mean))
            .with_measure(Measure::new(qty(), Aggregate::Count));
        assert_eq!(
            config.remove_y_measure(0),
            Some(Measure::new(price(), Aggregate::Mean))
        );
        assert_eq!(config.remove_y_measure(5), None);
        assert_eq!(config.y_measures.len(), 1);
    }

    #[test]
    fn test_usable_measures_whitelist() {
        let config = ChartConfig::new(ChartKind::Boxplot)
            .with_measure(Measure::new(price(), Aggregate::Mean));
        match config.usable_measures() {
            Err(PlotError::NoUsableMeasures(kind)) => assert_eq!(kind, ChartKind::Boxplot),
            other => panic!("Expected NoUsableMeasures, got {:?}", other),
        }
    }

    #[test]
    fn test_usable_measures_single_measure_keeps_first_survivor() {
        let config = ChartConfig::new(ChartKind::Boxplot)
            .with_measure(Measure::new(price(), Aggregate::Mean))
            .with_measure(Measure::new(qty(), Aggregate::Quartiles))
            .with_measure(Measure::new(price(), Aggregate::Quartiles));
        let usable = config.usable_measures().unwrap();
        assert_eq!(usable, vec![Measure::new(qty(), Aggregate::Quartiles)]);
    }

    #[test]
    fn test_usable_measures_empty() {
        let config = ChartConfig::new(ChartKind::Bar);
        assert!(matches!(
            config.usable_measures(),
            Err(PlotError::NoUsableMeasures(ChartKind::Bar))
        ));
    }

    #[test]
    fn test_set_kind_keeps_measures() {
        let mut config =
            ChartConfig::new(ChartKind::Bar).with_measure(Measure::new(price(), Aggregate::Mean));
        config.set_kind(ChartKind::Boxplot);
        assert_eq!(config.y_measures.len(), 1);
        assert!(config.usable_measures().is_err());
    }

    #[test]
    fn test_set_kind_to_xy_plots_raw_fields() {
        let mut config = ChartConfig::new(ChartKind::Bar);
        config.add_y_field(price(), Some(Aggregate::Mean)).unwrap();
        config.set_kind(ChartKind::Xy);

        assert_eq!(config.y_measures, vec![Measure::new(price(), Aggregate::Mean)]);
        assert_eq!(config.usable_measures().unwrap(), vec![Measure::raw(price())]);
    }

    #[test]
    fn test_set_kind_from_xy_aggregates_raw_fields() {
        let mut config = ChartConfig::new(ChartKind::Xy);
        config.add_y_field(price(), None).unwrap();
        config.set_kind(ChartKind::Bar);

        assert_eq!(
            config.usable_measures().unwrap(),
            vec![Measure::new(price(), Aggregate::Mean)]
        );

        // The default aggregate is not a boxplot aggregate
        config.set_kind(ChartKind::Boxplot);
        assert!(config.usable_measures().is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ChartConfig = serde_json::from_value(serde_json::json!({
            "kind": "line",
            "xField": {"name": "region", "dataType": "string"},
            "yMeasures": [{"field": {"name": "price", "dataType": "double"}, "agg": "quartiles"}],
            "width": 800,
            "height": 400
        }))
        .unwrap();
        assert_eq!(config.kind, ChartKind::Line);
        assert_eq!(config.x_field, Some(region()));
        assert_eq!(config.y_measures, vec![Measure::new(price(), Aggregate::Quartiles)]);
        assert!(config.x_axis_title.is_empty());
    }
}
