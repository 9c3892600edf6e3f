//! Domain models for the migration pipeline
//!
//! Typed rows for the three input tables and the derived aggregate,
//! map-point and flow-edge shapes handed to the presentation layer.

pub mod aggregate;
pub mod geo;
pub mod record;
pub mod types;

// Re-export commonly used types
pub use aggregate::AggregateRow;
pub use geo::{Coordinates, FlowEdge, GeoPoint, Located, MapPoint, OriginGeoPoint};
pub use record::MigrationRecord;
pub use types::{DateKey, PopulationType};
