//! Schema normalization for the input tables.
//!
//! Coordinate tables arrive with export-specific headers (`country`, `long`,
//! an unnamed index column) that are renamed to the canonical join-key names
//! before anything else touches them. Every table is then projected and cast
//! to the exact columns the pipeline reads.

pub mod conversion;
pub mod mapping;

pub use conversion::{ColumnSpec, conform, require_columns};
pub use mapping::{ANONYMOUS_INDEX, ColumnRename, SchemaMapping};

use arrow::datatypes::DataType;

use crate::models::geo::{LAT, LATITUDE, LON, LONGITUDE, NO};
use crate::models::record::{COUNTRY, COUNTRY_OF_ORIGIN, DATE, INDIVIDUALS, POPULATION_TYPE};

/// Canonical columns of the primary record table
pub const RECORD_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new(COUNTRY, DataType::Utf8),
    ColumnSpec::new(COUNTRY_OF_ORIGIN, DataType::Utf8),
    ColumnSpec::new(POPULATION_TYPE, DataType::Utf8),
    ColumnSpec::new(DATE, DataType::Utf8),
    ColumnSpec::new(INDIVIDUALS, DataType::Int64),
];

/// Canonical columns of the destination coordinate table
pub const DESTINATION_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::optional(NO, DataType::Int64),
    ColumnSpec::new(COUNTRY, DataType::Utf8),
    ColumnSpec::new(LAT, DataType::Float64),
    ColumnSpec::new(LON, DataType::Float64),
];

/// Canonical columns of the origin coordinate table
pub const ORIGIN_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::optional(NO, DataType::Int64),
    ColumnSpec::new(COUNTRY_OF_ORIGIN, DataType::Utf8),
    ColumnSpec::new(LATITUDE, DataType::Float64),
    ColumnSpec::new(LONGITUDE, DataType::Float64),
];
