//! Aggregate row model

use serde::Serialize;

/// A grouping key paired with the summed head count of its rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow<K> {
    pub key: K,
    #[serde(rename = "Individuals")]
    pub individuals: i64,
}

impl<K> AggregateRow<K> {
    #[must_use]
    pub const fn new(key: K, individuals: i64) -> Self {
        Self { key, individuals }
    }
}

/// Sum of all rows in an aggregate set, saturating at `i64::MAX`
#[must_use]
pub fn total<K>(rows: &[AggregateRow<K>]) -> i64 {
    rows.iter()
        .fold(0_i64, |acc, row| acc.saturating_add(row.individuals))
}
