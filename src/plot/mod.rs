//! Plot editor configuration model
//!
//! This module organizes the types the editor manipulates:
//!
//! - `kind` - Chart kinds and their synthesis metadata
//! - `aggregate` - Aggregates a measure can be summarized with
//! - `measure` - Y-axis measure selections
//! - `config` - The editor's chart configuration and its operations
//! - `request` - Name-only chart descriptions resolved against a schema

pub mod aggregate;
pub mod config;
pub mod kind;
pub mod measure;
pub mod request;

pub use aggregate::Aggregate;
pub use config::{ChartConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use kind::{ChartKind, KindTraits};
pub use measure::Measure;
pub use request::{parse_measure, ChartRequest};
