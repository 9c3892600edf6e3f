//! Data-preparation algorithms
//!
//! Joins against the coordinate tables, grouped sums and the headline totals.

pub mod aggregate;
pub mod join;
pub mod summary;

// Re-export commonly used items
pub use aggregate::{by_country, by_date, by_origin, by_population_type, map_points, sort_by_individuals_desc};
pub use join::{DestinationJoined, JoinOutcome, JoinStats, JoinedRecord, flow_edges, join_destinations, join_origins};
pub use summary::{FocusBreakdown, SummaryTotals};
