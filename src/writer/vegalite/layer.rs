//! Chart rendering for the Vega-Lite writer
//!
//! This module provides:
//! - Encoding channel helpers shared by every chart kind
//! - A trait-based approach to rendering each chart kind to the mark,
//!   encoding, transform and layer parts of a Vega-Lite spec
//!
//! Each chart kind can override the rendering phase it needs while using the
//! default single-mark behavior for everything else.

use crate::plot::{ChartKind, Measure};
use crate::schema::{dimension_type, EncodingType, Field};
use crate::{naming, PlotError, Result};
use serde_json::{json, Map, Value};

/// Pixel size of the box and median tick of a box plot
const BOXPLOT_MARK_SIZE: u32 = 14;

/// Opacity of the interquartile band of a line chart
const CONFIDENCE_BAND_OPACITY: f64 = 0.3;

// =============================================================================
// Encoding Helpers
// =============================================================================

/// Attach `axis.title` to an encoding channel; empty titles are omitted
pub fn set_axis_title(channel: &mut Value, title: &str) {
    if !title.is_empty() {
        channel["axis"] = json!({ "title": title });
    }
}

/// Positional x channel bound to a field
pub fn x_channel(field: &Field, encoding_type: EncodingType) -> Value {
    json!({
        "field": field.name,
        "type": encoding_type.as_str()
    })
}

/// Quantitative y channel bound to a column
pub fn y_channel(field: &str) -> Value {
    json!({
        "field": field,
        "type": EncodingType::Quantitative.as_str()
    })
}

/// How the selected measures bind to the y channel.
///
/// A single measure binds its expression directly. Several measures are
/// folded into `key`/`value` rows, y reads `value` and color separates the
/// series by `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureBinding {
    /// Column the y channel reads
    pub field: String,
    pub transform: Vec<Value>,
    pub color: Option<Value>,
}

impl MeasureBinding {
    pub fn new(measures: &[&Measure]) -> Self {
        match measures {
            [single] => Self {
                field: single.expression(),
                transform: Vec::new(),
                color: None,
            },
            _ => {
                let expressions: Vec<String> = measures.iter().map(|m| m.expression()).collect();
                Self {
                    field: naming::FOLD_VALUE.to_string(),
                    transform: vec![json!({ "fold": expressions })],
                    color: Some(json!({
                        "field": naming::FOLD_KEY,
                        "type": EncodingType::Nominal.as_str()
                    })),
                }
            }
        }
    }
}

// =============================================================================
// ChartRenderer Trait System
// =============================================================================

/// Inputs shared by every renderer for one synthesis call
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub kind: &'a ChartKind,
    pub x_field: &'a Field,
    /// Measures that survived the kind's aggregate rules, never empty
    pub measures: &'a [&'a Measure],
    pub x_title: &'a str,
    pub y_title: &'a str,
}

/// Trait for rendering chart kinds to Vega-Lite
///
/// `render` returns the kind-specific top-level keys of the spec (`mark`,
/// `encoding`, `transform`, `layer`). Data binding, canvas size and titles
/// are added by the writer.
///
/// Most kinds use the default single-mark rendering and only choose their
/// mark. Kinds that expand into several layers override `render`.
pub trait ChartRenderer: Send + Sync {
    /// Mark drawn by single-mark charts.
    /// Default: the kind's own mark name
    fn mark<'a>(&self, kind: &'a ChartKind) -> &'a str {
        kind.mark()
    }

    /// Render the kind-specific part of the spec.
    /// Default: a single mark with x, y and (for several measures) color
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Map<String, Value>> {
        Ok(single_mark(self.mark(ctx.kind), ctx))
    }
}

fn single_mark(mark: &str, ctx: &RenderContext<'_>) -> Map<String, Value> {
    let binding = MeasureBinding::new(ctx.measures);

    let mut x = x_channel(ctx.x_field, dimension_type(ctx.x_field.data_type));
    set_axis_title(&mut x, ctx.x_title);
    let mut y = y_channel(&binding.field);
    set_axis_title(&mut y, ctx.y_title);

    let mut encoding = Map::new();
    encoding.insert("x".to_string(), x);
    encoding.insert("y".to_string(), y);
    if let Some(color) = binding.color {
        encoding.insert("color".to_string(), color);
    }

    let mut body = Map::new();
    body.insert("mark".to_string(), json!(mark));
    body.insert("encoding".to_string(), Value::Object(encoding));
    if !binding.transform.is_empty() {
        body.insert("transform".to_string(), json!(binding.transform));
    }
    body
}

// =============================================================================
// Default Renderer (bar and unregistered marks)
// =============================================================================

/// Default renderer used for kinds with standard behavior
pub struct DefaultRenderer;

impl ChartRenderer for DefaultRenderer {}

// =============================================================================
// XY Renderer
// =============================================================================

/// Renderer for scatter plots: raw fields drawn as points
pub struct XyRenderer;

impl ChartRenderer for XyRenderer {
    fn mark<'a>(&self, _kind: &'a ChartKind) -> &'a str {
        "point"
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Result<Map<String, Value>> {
        // Points always read the bare fields, never aggregates
        let raw: Vec<Measure> = ctx.measures.iter().map(|m| Measure::raw(m.field.clone())).collect();
        let raw: Vec<&Measure> = raw.iter().collect();
        let ctx = RenderContext {
            measures: &raw,
            ..ctx.clone()
        };
        Ok(single_mark(self.mark(ctx.kind), &ctx))
    }
}

// =============================================================================
// Line Renderer
// =============================================================================

/// Renderer for line charts.
///
/// Quartile measures switch to confidence-band mode: an interquartile area,
/// a median line and a line on the measure itself, stacked over a shared
/// ordinal x.
pub struct LineRenderer;

impl ChartRenderer for LineRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Map<String, Value>> {
        let binding = MeasureBinding::new(ctx.measures);
        let confidence_bands = ctx.measures.iter().any(|m| m.is_compound());
        let x = x_channel(ctx.x_field, EncodingType::Ordinal);

        let create_layer = |mark: &str, y_field: &str| -> Value {
            let mut layer = json!({
                "mark": mark,
                "encoding": {
                    "x": x.clone(),
                    "y": y_channel(y_field)
                }
            });
            if let Some(color) = &binding.color {
                layer["encoding"]["color"] = color.clone();
            }
            layer
        };

        let mut layers = if confidence_bands {
            let mut band = create_layer("area", &naming::sub_field(&binding.field, "q1"));
            band["encoding"]["y2"] = json!({ "field": naming::sub_field(&binding.field, "q3") });
            band["encoding"]["opacity"] = json!({ "value": CONFIDENCE_BAND_OPACITY });

            let median = create_layer("line", &naming::sub_field(&binding.field, "median"));
            let value = create_layer("line", &binding.field);
            vec![band, median, value]
        } else {
            vec![create_layer("line", &binding.field)]
        };

        // User titles label the axes through the first layer
        if let Some(first) = layers.first_mut() {
            set_axis_title(&mut first["encoding"]["x"], ctx.x_title);
            set_axis_title(&mut first["encoding"]["y"], ctx.y_title);
        }

        let mut body = Map::new();
        if !binding.transform.is_empty() {
            body.insert("transform".to_string(), json!(binding.transform));
        }
        body.insert("layer".to_string(), Value::Array(layers));
        Ok(body)
    }
}

// =============================================================================
// Boxplot Renderer
// =============================================================================

/// Renderer for box plots over pre-aggregated quartiles.
///
/// Expands into five layers sharing one x channel: lower whisker, upper
/// whisker, box, median tick and mean point.
pub struct BoxplotRenderer;

impl ChartRenderer for BoxplotRenderer {
    fn render(&self, ctx: &RenderContext<'_>) -> Result<Map<String, Value>> {
        let measure = ctx.measures.first().ok_or_else(|| {
            PlotError::InternalError("Boxplot rendering requires a quartiles measure".to_string())
        })?;
        let expression = measure.expression();
        let stat = |name: &str| naming::sub_field(&expression, name);

        let mut x = x_channel(ctx.x_field, dimension_type(ctx.x_field.data_type));
        set_axis_title(&mut x, ctx.x_title);

        // Helper to create a layer over the shared x channel
        let create_layer = |mark: Value, y_field: &str, y2_field: Option<&str>| -> Value {
            let mut layer = json!({
                "mark": mark,
                "encoding": {
                    "x": x.clone(),
                    "y": y_channel(y_field)
                }
            });
            if let Some(y2_field) = y2_field {
                layer["encoding"]["y2"] = json!({ "field": y2_field });
            }
            layer
        };

        // Lower whisker (rule from min to q1), carries the y-axis title
        let mut lower_whisker = create_layer(
            json!({"type": "rule", "style": "boxplot-rule"}),
            &stat("min"),
            Some(stat("q1").as_str()),
        );
        set_axis_title(&mut lower_whisker["encoding"]["y"], ctx.y_title);

        // Upper whisker (rule from q3 to max)
        let upper_whisker = create_layer(
            json!({"type": "rule", "style": "boxplot-rule"}),
            &stat("q3"),
            Some(stat("max").as_str()),
        );

        // Box (bar from q1 to q3)
        let box_part = create_layer(
            json!({"type": "bar", "size": BOXPLOT_MARK_SIZE, "style": "boxplot-box"}),
            &stat("q1"),
            Some(stat("q3").as_str()),
        );

        // Median tick
        let median_tick = create_layer(
            json!({
                "color": "white",
                "type": "tick",
                "size": BOXPLOT_MARK_SIZE,
                "orient": "horizontal",
                "style": "boxplot-median"
            }),
            &stat("median"),
            None,
        );

        // Mean point
        let mean_point = create_layer(
            json!({
                "color": "black",
                "type": "point",
                "size": BOXPLOT_MARK_SIZE / 2
            }),
            &stat("mean"),
            None,
        );

        let mut body = Map::new();
        body.insert(
            "layer".to_string(),
            json!([lower_whisker, upper_whisker, box_part, median_tick, mean_point]),
        );
        Ok(body)
    }
}

/// Get the renderer for a chart kind
pub fn get_renderer(kind: &ChartKind) -> Box<dyn ChartRenderer> {
    match kind {
        ChartKind::Line => Box::new(LineRenderer),
        ChartKind::Xy => Box::new(XyRenderer),
        ChartKind::Boxplot => Box::new(BoxplotRenderer),
        // Bar and any other mark use the default renderer
        ChartKind::Bar | ChartKind::Other(_) => Box::new(DefaultRenderer),
    }
}
