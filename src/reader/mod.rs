//! Data source abstraction layer for plotsynth
//!
//! The reader module loads the table a chart is drawn from and turns result
//! rows into the JSON records the Vega-Lite renderer consumes.
//!
//! # Architecture
//!
//! All readers implement the `Reader` trait, which provides:
//! - Table loading → DataFrame conversion
//! - Schema introspection for the editor's field list
//!
//! # Example
//!
//! ```rust,no_run
//! use plotsynth::reader::{CsvFileReader, Reader};
//!
//! let reader = CsvFileReader::new("sales.csv");
//! let fields = reader.schema()?;
//! # Ok::<(), plotsynth::PlotError>(())
//! ```

use crate::schema::{schema_of, Schema};
use crate::{DataFrame, Result};

pub mod csv;
pub mod values;

pub use csv::{read_csv, CsvFileReader};
pub use values::{dataframe_to_values, series_value_at};

/// Trait for data source readers
///
/// Readers load a table and return it as a Polars DataFrame.
pub trait Reader {
    /// Name the chart's data source is bound to
    fn name(&self) -> &str;

    /// Load the full table
    ///
    /// # Errors
    ///
    /// Returns `PlotError::ReaderError` if the source cannot be read or
    /// parsed.
    fn read(&self) -> Result<DataFrame>;

    /// Field list of the table
    fn schema(&self) -> Result<Schema> {
        Ok(schema_of(&self.read()?))
    }
}
