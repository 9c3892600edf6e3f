//! Logging utilities
//!
//! Consistent `log` output for load steps and join audits.

pub mod log;

// Re-export commonly used functions for convenience
pub use log::{log_empty_table, log_join_audit, log_table_loaded, log_table_loading};
