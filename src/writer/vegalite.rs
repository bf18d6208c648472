//! Vega-Lite JSON writer implementation
//!
//! Converts chart configurations into Vega-Lite v3 specifications for the
//! plot editor's renderer.
//!
//! # Mapping Strategy
//!
//! - chart kind → renderer (see [`layer::get_renderer`])
//! - x-field → positional x channel typed by the field's dimension type
//! - y-measures → y channel, folded into `key`/`value` series when several
//! - data → a named data source filled by the renderer's row stream
//!
//! # Example
//!
//! ```rust
//! use plotsynth::plot::{Aggregate, ChartConfig, ChartKind, Measure};
//! use plotsynth::schema::{DataType, Field};
//! use plotsynth::writer::VegaLiteWriter;
//!
//! let config = ChartConfig::new(ChartKind::Boxplot)
//!     .with_x_field(Field::new("group", DataType::String))
//!     .with_measure(Measure::new(Field::new("v", DataType::Double), Aggregate::Quartiles));
//!
//! let spec = VegaLiteWriter::new("df").synthesize(&config)?;
//! assert_eq!(spec["layer"].as_array().map(Vec::len), Some(5));
//! # Ok::<(), plotsynth::PlotError>(())
//! ```

pub mod layer;

use crate::writer::Writer;
use crate::{ChartConfig, Field, Measure, PlotError, Result};
use serde_json::{json, Value};

pub use layer::{get_renderer, ChartRenderer, MeasureBinding, RenderContext};

/// Vega-Lite schema version the renderer understands
pub const VEGALITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v3.json";

/// Space left around the canvas inside the output area, per axis
pub const CANVAS_MARGIN: u32 = 100;

/// Vega-Lite JSON writer
///
/// Generates Vega-Lite v3 specifications bound to a named data source.
pub struct VegaLiteWriter {
    /// Vega-Lite schema version
    schema: String,
    /// Name of the data source the renderer streams rows into
    data_name: String,
    /// Canvas size overriding the one derived from the output area
    size: Option<(u32, u32)>,
}

impl VegaLiteWriter {
    /// Create a writer bound to the data source `data_name`
    pub fn new(data_name: impl Into<String>) -> Self {
        Self {
            schema: VEGALITE_SCHEMA.to_string(),
            data_name: data_name.into(),
            size: None,
        }
    }

    /// Use a fixed canvas size instead of the output area minus the margin
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    pub fn data_name(&self) -> &str {
        &self.data_name
    }

    fn canvas_size(&self, config: &ChartConfig) -> (u32, u32) {
        self.size.unwrap_or((
            config.width.saturating_sub(CANVAS_MARGIN),
            config.height.saturating_sub(CANVAS_MARGIN),
        ))
    }

    fn x_field<'a>(&self, config: &'a ChartConfig) -> Result<&'a Field> {
        config.x_field.as_ref().ok_or_else(|| {
            PlotError::ValidationError(format!(
                "{} chart has no x-axis field",
                config.kind
            ))
        })
    }

    /// Synthesize the Vega-Lite spec for a configuration.
    ///
    /// The result is a pure function of `config`: the same configuration
    /// always yields the same document.
    pub fn synthesize(&self, config: &ChartConfig) -> Result<Value> {
        let x_field = self.x_field(config)?;
        let plotted = config.usable_measures()?;
        let measures: Vec<&Measure> = plotted.iter().collect();

        tracing::debug!(
            kind = %config.kind,
            x = %x_field.name,
            measures = measures.len(),
            "Synthesizing Vega-Lite spec"
        );

        let ctx = RenderContext {
            kind: &config.kind,
            x_field,
            measures: &measures,
            x_title: &config.x_axis_title,
            y_title: &config.y_axis_title,
        };
        let body = get_renderer(&config.kind).render(&ctx)?;

        let (width, height) = self.canvas_size(config);
        let mut vl_spec = json!({
            "$schema": self.schema,
            "data": {"name": self.data_name},
            "width": width,
            "height": height
        });
        if let Value::Object(ref mut map) = vl_spec {
            map.extend(body);
        }

        if !config.plot_title.is_empty() {
            vl_spec["title"] = json!(config.plot_title);
        }
        vl_spec["autosize"] = json!("fit");

        Ok(vl_spec)
    }

    /// Synthesize a spec with the plotted rows embedded as `data.values`
    pub fn synthesize_with_values(&self, config: &ChartConfig, values: Vec<Value>) -> Result<Value> {
        let mut vl_spec = self.synthesize(config)?;
        vl_spec["data"]["values"] = Value::Array(values);
        Ok(vl_spec)
    }
}

impl Writer for VegaLiteWriter {
    type Output = String;

    fn write(&self, config: &ChartConfig) -> Result<String> {
        let vl_spec = self.synthesize(config)?;
        serde_json::to_string_pretty(&vl_spec)
            .map_err(|e| PlotError::WriterError(format!("Failed to serialize Vega-Lite spec: {}", e)))
    }

    fn validate(&self, config: &ChartConfig) -> Result<()> {
        self.x_field(config)?;
        config.usable_measures()?;
        Ok(())
    }
}
