/*!
# plotsynth - Chart specifications for a notebook plot editor

A notebook plot editor lets users drag table fields onto an x-axis and a
y-axis, pick aggregates and a chart kind, and renders the result with
Vega-Lite. This crate holds everything behind that UI that is not UI:

- the configuration model the drag-and-drop wiring edits,
- the synthesis of a Vega-Lite document from that configuration,
- the table operations that pre-aggregate the plotted data,
- the serializer that embeds a chart into a reproducible code cell.

## Example

```rust
use plotsynth::plot::{Aggregate, ChartConfig, ChartKind};
use plotsynth::schema::{DataType, Field};
use plotsynth::writer::VegaLiteWriter;

let mut config = ChartConfig::new(ChartKind::Bar);
config.set_x_field(Field::new("region", DataType::String))?;
config.add_y_field(Field::new("price", DataType::Double), Some(Aggregate::Mean))?;

let spec = VegaLiteWriter::new("sales").synthesize(&config)?;
assert_eq!(spec["mark"], "bar");
assert_eq!(spec["encoding"]["y"]["field"], "mean(price)");
# Ok::<(), plotsynth::PlotError>(())
```

## Core Components

- [`schema`] - Fields, type tags and role classification
- [`plot`] - Chart kinds, measures and the chart configuration
- [`writer`] - Vega-Lite spec synthesis
- [`table`] - Table operations derived from a configuration
- [`reader`] - Loading tables and converting rows to JSON
- [`export`] - Embedding specs into code cells
*/

pub mod export;
pub mod naming;
pub mod plot;
pub mod reader;
pub mod schema;
pub mod table;

#[cfg(feature = "vegalite")]
pub mod writer;

// Re-export key types for convenience
pub use plot::{Aggregate, ChartConfig, ChartKind, ChartRequest, Measure};
pub use schema::{DataType, EncodingType, Field, FieldRole};

// DataFrame abstraction (wraps Polars)
pub use polars::prelude::DataFrame;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("No usable measures for {0}")]
    NoUsableMeasures(ChartKind),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data source error: {0}")]
    ReaderError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
