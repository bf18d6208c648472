//! CSV file data source

use crate::reader::Reader;
use crate::{DataFrame, PlotError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Read a CSV file with a header row, inferring column types.
///
/// Date and datetime columns are recognized so they can serve as ordinal
/// x-axis dimensions.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| {
            PlotError::ReaderError(format!("Failed to read CSV '{}': {}", path.display(), e))
        })?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Loaded CSV"
    );
    Ok(df)
}

/// Reader over a single CSV file
///
/// The data source name defaults to the file stem.
pub struct CsvFileReader {
    path: PathBuf,
    name: String,
}

impl CsvFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data".to_string());
        Self { path, name }
    }

    /// Bind the chart to a different data source name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Reader for CsvFileReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&self) -> Result<DataFrame> {
        read_csv(&self.path)
    }
}
