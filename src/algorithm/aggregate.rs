//! Grouped sums over the primary record table
//!
//! Aggregation always runs on the full record table, before any coordinate
//! join, so the grouped totals are unaffected by missing coordinates. Only the
//! map-point step that follows is an inner join.

use std::collections::BTreeMap;

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::algorithm::join::{JoinOutcome, JoinStats};
use crate::models::{AggregateRow, DateKey, Located, MapPoint, MigrationRecord, PopulationType};
use crate::utils::logging::log_join_audit;

/// Sum Individuals per key
///
/// Every key seen gets a row, but rows with Individuals ≤ 0 add nothing to
/// it, so a key carried only by such rows sums to 0. Rows for which `key`
/// returns `None` are left out. Sums saturate at `i64::MAX`. Output is
/// ordered by key.
pub fn sum_by<'a, K, F>(
    records: impl IntoIterator<Item = &'a MigrationRecord>,
    key: F,
) -> Vec<AggregateRow<K>>
where
    K: Ord,
    F: Fn(&MigrationRecord) -> Option<K>,
{
    let mut sums: BTreeMap<K, i64> = BTreeMap::new();
    for record in records {
        let Some(group) = key(record) else {
            continue;
        };
        let sum = sums.entry(group).or_insert(0);
        if record.counts() {
            *sum = sum.saturating_add(record.individuals);
        }
    }
    sums.into_iter()
        .map(|(key, individuals)| AggregateRow::new(key, individuals))
        .collect()
}

/// Total per destination country
#[must_use]
pub fn by_country(records: &[MigrationRecord]) -> Vec<AggregateRow<String>> {
    sum_by(records, |r| Some(r.country.clone()))
}

/// Total per country of origin
#[must_use]
pub fn by_origin(records: &[MigrationRecord]) -> Vec<AggregateRow<String>> {
    sum_by(records, |r| Some(r.country_of_origin.clone()))
}

/// Total per population type
#[must_use]
pub fn by_population_type(records: &[MigrationRecord]) -> Vec<AggregateRow<PopulationType>> {
    sum_by(records, |r| Some(r.population_type.clone()))
}

/// Total per reporting date, chronological
///
/// Rows with a blank date have no group and are left out.
#[must_use]
pub fn by_date(records: &[MigrationRecord]) -> Vec<AggregateRow<DateKey>> {
    sum_by(records, |r| {
        (!r.date.trim().is_empty()).then(|| DateKey::new(&r.date))
    })
}

/// Join a per-country aggregate back onto its coordinate table
///
/// Output follows coordinate-table order; a coordinate row whose country has
/// no aggregate is skipped, as is every repeat of an already used country.
/// The audit counts aggregate rows that found no coordinates.
pub fn map_points<G>(
    name: &str,
    coordinates: &[G],
    aggregate: &[AggregateRow<String>],
    size_divisor: f64,
) -> JoinOutcome<MapPoint<G>>
where
    G: Located + Clone,
{
    let totals: FxHashMap<&str, i64> = aggregate
        .iter()
        .map(|row| (row.key.as_str(), row.individuals))
        .collect();

    let points: Vec<MapPoint<G>> = coordinates
        .iter()
        .unique_by(|geo| geo.label().to_string())
        .filter_map(|geo| {
            totals
                .get(geo.label())
                .map(|&individuals| MapPoint::new(geo.clone(), individuals, size_divisor))
        })
        .collect();

    let placed: FxHashSet<&str> = points.iter().map(MapPoint::label).collect();
    let unmatched: Vec<&AggregateRow<String>> = aggregate
        .iter()
        .filter(|row| !placed.contains(row.key.as_str()))
        .collect();

    let stats = JoinStats {
        name: name.to_string(),
        left_rows: aggregate.len(),
        matched_rows: points.len(),
        dropped_rows: unmatched.len(),
        dropped_individuals: unmatched
            .iter()
            .fold(0_i64, |acc, row| acc.saturating_add(row.individuals)),
        unmatched_keys: unmatched.iter().map(|row| row.key.clone()).collect(),
    };
    log_join_audit(&stats);

    JoinOutcome {
        rows: points,
        stats,
    }
}

/// Points ordered by Individuals, largest first
///
/// The sort is numeric and stable: ties keep their input order.
#[must_use]
pub fn sort_by_individuals_desc<G: Clone>(points: &[MapPoint<G>]) -> Vec<MapPoint<G>> {
    points
        .iter()
        .sorted_by(|a, b| b.individuals.cmp(&a.individuals))
        .cloned()
        .collect()
}
