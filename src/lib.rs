//! Data preparation for a displacement dashboard.
//!
//! Loads UNHCR refugee and asylum-seeker records together with destination and
//! origin coordinate tables, joins them, aggregates head counts and exposes the
//! filtered views a map and chart front end needs.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{DefaultSelection, FocusCountry, PipelineConfig};
pub use error::{PipelineError, Result};
pub use filter::Selection;
pub use loader::{InputTables, load_inputs};
pub use pipeline::{Pipeline, PresentationData, run_pipeline};

// Domain types
pub use models::{
    AggregateRow, Coordinates, DateKey, FlowEdge, GeoPoint, MapPoint, MigrationRecord,
    OriginGeoPoint, PopulationType,
};

// Arrow types
pub use arrow::record_batch::RecordBatch;
