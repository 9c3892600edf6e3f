//! Inner joins between migration records and coordinate tables
//!
//! Every join here is an inner join: a row whose key has no match in the
//! coordinate table is dropped. Drops are never silent; each join returns a
//! [`JoinStats`] with the count, the head count lost and the offending keys.

use std::collections::BTreeSet;
use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::models::{Coordinates, FlowEdge, GeoPoint, Located, MigrationRecord, OriginGeoPoint};
use crate::utils::logging::log_join_audit;

/// Audit record for one inner join
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    /// Which join this was
    pub name: String,
    /// Rows on the left side
    pub left_rows: usize,
    /// Left rows that found a match
    pub matched_rows: usize,
    /// Left rows without a match
    pub dropped_rows: usize,
    /// Head count carried by the dropped rows (positive rows only)
    pub dropped_individuals: i64,
    /// Distinct keys that had no match, sorted
    pub unmatched_keys: Vec<String>,
}

/// Rows produced by a join, with its audit
#[derive(Debug, Clone)]
pub struct JoinOutcome<T> {
    pub rows: Vec<T>,
    pub stats: JoinStats,
}

/// Lookup from join key to coordinate row
///
/// The first row for a key wins; later duplicates are reported and ignored so
/// a join can never multiply records.
#[derive(Debug)]
pub struct KeyIndex<'a, R> {
    rows: FxHashMap<&'a str, &'a R>,
}

impl<'a, R: Located> KeyIndex<'a, R> {
    /// Index a coordinate table by its label
    #[must_use]
    pub fn build(table: &'a [R], name: &str) -> Self {
        let mut rows = FxHashMap::default();
        rows.reserve(table.len());
        for row in table {
            match rows.entry(row.label()) {
                Entry::Occupied(_) => log::warn!(
                    "{name}: duplicate coordinate row for '{}', keeping the first",
                    row.label()
                ),
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
            }
        }
        Self { rows }
    }

    /// Find the row for a key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a R> {
        self.rows.get(key).copied()
    }
}

/// Generic inner join of `left` against a keyed coordinate table
///
/// Output order follows `left`. `weight` gives the head count a left row
/// carries, used only for the audit.
pub fn inner_join<'a, L, R, T>(
    name: &str,
    left: &'a [L],
    right: &KeyIndex<'a, R>,
    left_key: impl Fn(&L) -> &str,
    weight: impl Fn(&L) -> i64,
    mut combine: impl FnMut(&'a L, &'a R) -> T,
) -> JoinOutcome<T>
where
    R: Located,
{
    let mut rows = Vec::with_capacity(left.len());
    let mut unmatched = BTreeSet::new();
    let mut dropped_rows = 0;
    let mut dropped_individuals: i64 = 0;

    for row in left {
        let key = left_key(row);
        match right.get(key) {
            Some(matched) => rows.push(combine(row, matched)),
            None => {
                dropped_rows += 1;
                dropped_individuals = dropped_individuals.saturating_add(weight(row).max(0));
                unmatched.insert(key.to_string());
            }
        }
    }

    let stats = JoinStats {
        name: name.to_string(),
        left_rows: left.len(),
        matched_rows: rows.len(),
        dropped_rows,
        dropped_individuals,
        unmatched_keys: unmatched.into_iter().collect(),
    };
    log_join_audit(&stats);

    JoinOutcome { rows, stats }
}

/// A migration record annotated with its destination coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationJoined {
    #[serde(flatten)]
    pub record: MigrationRecord,
    pub destination: Coordinates,
}

/// A migration record annotated with both destination and origin coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRecord {
    #[serde(flatten)]
    pub record: MigrationRecord,
    pub destination: Coordinates,
    pub origin: Coordinates,
}

/// `records ⋈ destinations` on the destination country
pub fn join_destinations(
    records: &[MigrationRecord],
    destinations: &[GeoPoint],
) -> JoinOutcome<DestinationJoined> {
    let index = KeyIndex::build(destinations, "destination coordinates");
    inner_join(
        "records x destinations",
        records,
        &index,
        |r| r.country.as_str(),
        |r| r.individuals,
        |record, geo| DestinationJoined {
            record: record.clone(),
            destination: geo.coordinates(),
        },
    )
}

/// `(records ⋈ destinations) ⋈ origins` on the country of origin
pub fn join_origins(
    joined: &[DestinationJoined],
    origins: &[OriginGeoPoint],
) -> JoinOutcome<JoinedRecord> {
    let index = KeyIndex::build(origins, "origin coordinates");
    inner_join(
        "records x destinations x origins",
        joined,
        &index,
        |j| j.record.country_of_origin.as_str(),
        |j| j.record.individuals,
        |j, geo| JoinedRecord {
            record: j.record.clone(),
            destination: j.destination,
            origin: geo.coordinates(),
        },
    )
}

/// Row-level flow edges: fully joined rows with Individuals above `threshold`
#[must_use]
pub fn flow_edges(joined: &[JoinedRecord], threshold: i64) -> Vec<FlowEdge> {
    let edges: Vec<FlowEdge> = joined
        .iter()
        .filter(|j| j.record.individuals > threshold)
        .map(|j| FlowEdge {
            country: j.record.country.clone(),
            country_of_origin: j.record.country_of_origin.clone(),
            population_type: j.record.population_type.clone(),
            date: j.record.date.clone(),
            individuals: j.record.individuals,
            source: j.origin,
            target: j.destination,
        })
        .collect();

    log::debug!(
        "Selected {} flow edges from {} joined rows (Individuals > {threshold})",
        edges.len(),
        joined.len()
    );
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(country: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint {
            no: None,
            country: country.to_string(),
            lat,
            lon,
        }
    }

    fn origin(country: &str, latitude: f64, longitude: f64) -> OriginGeoPoint {
        OriginGeoPoint {
            no: None,
            country_of_origin: country.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn destination_join_drops_unmatched_rows() {
        let records = vec![
            MigrationRecord::new("Chad", "Sudan", "Refugees", "2024-01", 300),
            MigrationRecord::new("Eritrea", "Sudan", "Refugees", "2024-01", 50),
            MigrationRecord::new("Chad", "Sudan", "Refugees", "2024-02", 10),
        ];
        let outcome = join_destinations(&records, &[geo("Chad", 15.0, 19.0)]);

        assert_eq!(outcome.rows.len(), 2);
        assert!(outcome.rows.iter().all(|r| r.record.country == "Chad"));
        assert_eq!(outcome.stats.dropped_rows, 1);
        assert_eq!(outcome.stats.dropped_individuals, 50);
        assert_eq!(outcome.stats.unmatched_keys, vec!["Eritrea".to_string()]);
        assert_eq!(outcome.stats.left_rows, 3);
    }

    #[test]
    fn duplicate_coordinates_do_not_multiply_rows() {
        let records = vec![MigrationRecord::new("Chad", "Sudan", "Refugees", "2024-01", 1)];
        let outcome = join_destinations(
            &records,
            &[geo("Chad", 15.0, 19.0), geo("Chad", 99.0, 99.0)],
        );
        assert_eq!(outcome.rows.len(), 1);
        assert!((outcome.rows[0].destination.lat - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn full_join_carries_both_coordinates() {
        let records = vec![
            MigrationRecord::new("Chad", "Sudan", "Refugees", "2024-01", 300_000),
            MigrationRecord::new("Chad", "Atlantis", "Refugees", "2024-01", 9),
        ];
        let step1 = join_destinations(&records, &[geo("Chad", 15.0, 19.0)]);
        let step2 = join_origins(&step1.rows, &[origin("Sudan", 16.0, 30.0)]);

        assert_eq!(step2.rows.len(), 1);
        let row = &step2.rows[0];
        assert!((row.origin.lat - 16.0).abs() < f64::EPSILON);
        assert!((row.destination.lon - 19.0).abs() < f64::EPSILON);
        assert_eq!(step2.stats.unmatched_keys, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn flow_edges_apply_threshold() {
        let joined = |origin: &str, n: i64| JoinedRecord {
            record: MigrationRecord::new("Chad", origin, "Refugees", "2024-01", n),
            destination: Coordinates { lat: 15.0, lon: 19.0 },
            origin: Coordinates { lat: 16.0, lon: 30.0 },
        };
        let rows = vec![joined("Sudan", 10_001), joined("Sudan", 10_000), joined("Sudan", 3)];
        let edges = flow_edges(&rows, 10_000);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].individuals, 10_001);
        assert!((edges[0].source.lon - 30.0).abs() < f64::EPSILON);
        assert!((edges[0].target.lon - 19.0).abs() < f64::EPSILON);
    }
}
