//! Output writer abstraction layer for plotsynth
//!
//! The writer module provides a pluggable interface for turning a chart
//! configuration into a chart specification document.
//!
//! # Architecture
//!
//! All writers implement the `Writer` trait, which provides:
//! - Configuration → Output conversion
//! - Validation for writer compatibility
//!
//! # Example
//!
//! ```rust
//! use plotsynth::plot::{Aggregate, ChartConfig, ChartKind, Measure};
//! use plotsynth::schema::{DataType, Field};
//! use plotsynth::writer::{VegaLiteWriter, Writer};
//!
//! let config = ChartConfig::new(ChartKind::Line)
//!     .with_x_field(Field::new("year", DataType::Int))
//!     .with_measure(Measure::new(Field::new("price", DataType::Double), Aggregate::Mean));
//!
//! let writer = VegaLiteWriter::new("sales");
//! let json = writer.write(&config)?;
//! assert!(json.contains("\"mean(price)\""));
//! # Ok::<(), plotsynth::PlotError>(())
//! ```

use crate::{ChartConfig, Result};

#[cfg(feature = "vegalite")]
pub mod vegalite;

#[cfg(feature = "vegalite")]
pub use vegalite::VegaLiteWriter;

/// Trait for chart specification writers
///
/// Writers read a chart configuration and produce formatted output. They
/// never mutate the configuration.
///
/// # Associated Types
///
/// * `Output` - The type returned by `write()`
pub trait Writer {
    /// The output type produced by this writer.
    type Output;

    /// Generate output from a chart configuration
    ///
    /// # Errors
    ///
    /// Returns `PlotError::NoUsableMeasures` when no measure survives the
    /// chart kind's aggregate rules, or `PlotError::ValidationError` when
    /// the configuration cannot be rendered by this writer.
    fn write(&self, config: &ChartConfig) -> Result<Self::Output>;

    /// Validate that a configuration is compatible with this writer
    ///
    /// Checks whether the configuration can be rendered without actually
    /// generating output.
    fn validate(&self, config: &ChartConfig) -> Result<()>;
}
