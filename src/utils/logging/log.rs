//! Log lines for table loads and join audits

use std::path::Path;
use std::time::Duration;

use crate::algorithm::join::JoinStats;

/// How many unmatched keys are spelled out in a join warning
const MAX_LISTED_KEYS: usize = 20;

/// Announce that `table` is about to be read from `path`
pub fn log_table_loading(table: &str, path: &Path) {
    log::info!("Loading {table} from {}", path.display());
}

/// Report a finished table load
pub fn log_table_loaded(table: &str, path: &Path, rows: usize, elapsed: Duration) {
    log::info!("Loaded {rows} {table} rows from {} in {elapsed:?}", path.display());
}

/// A table with a header and no rows is legal but almost always a mistake
pub fn log_empty_table(table: &str, path: &Path) {
    log::warn!("{} has no {table} rows; every join against it will be empty", path.display());
}

/// Log the outcome of an inner join
///
/// Dropped rows are a warning, with the unmatched keys listed so totals before
/// and after the join can be reconciled.
pub fn log_join_audit(stats: &JoinStats) {
    if stats.dropped_rows == 0 {
        log::info!(
            "Join {}: {} of {} rows matched",
            stats.name,
            stats.matched_rows,
            stats.left_rows
        );
        return;
    }

    let listed: Vec<&str> = stats
        .unmatched_keys
        .iter()
        .take(MAX_LISTED_KEYS)
        .map(String::as_str)
        .collect();
    let more = stats.unmatched_keys.len().saturating_sub(listed.len());
    let suffix = if more > 0 {
        format!(" and {more} more")
    } else {
        String::new()
    };

    log::warn!(
        "Join {}: dropped {} of {} rows ({} individuals) with no coordinate match: {}{}",
        stats.name,
        stats.dropped_rows,
        stats.left_rows,
        stats.dropped_individuals,
        listed.join(", "),
        suffix
    );
}
