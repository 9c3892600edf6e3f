mod utils;

use std::collections::BTreeSet;

use migration_stats::models::aggregate::total;
use migration_stats::{
    GeoPoint, InputTables, MigrationRecord, OriginGeoPoint, Pipeline, PipelineConfig, Selection,
};
use rand::prelude::*;
use rand::rngs::StdRng;

const COUNTRIES: &[&str] = &[
    "Chad",
    "Sudan",
    "South Sudan",
    "Ethiopia",
    "Uganda",
    "Kenya",
    "Somalia",
    "Eritrea",
    "Central African Republic",
    "Others",
    "Various",
];

const POPULATION_TYPES: &[&str] = &["Refugees", "Asylum-Seekers", "Others of Concern"];

const DATES: &[&str] = &["2023-12-31", "2024-01-31", "2024-02-29", "2024-03"];

/// Random tables where every coordinate table misses a few countries
fn random_tables(seed: u64, rows: usize) -> InputTables {
    let mut rng = StdRng::seed_from_u64(seed);
    let pick = |rng: &mut StdRng, from: &[&str]| from[rng.random_range(0..from.len())].to_string();

    let records = (0..rows)
        .map(|_| {
            let country = pick(&mut rng, COUNTRIES);
            let origin = pick(&mut rng, COUNTRIES);
            let population_type = pick(&mut rng, POPULATION_TYPES);
            let date = pick(&mut rng, DATES);
            let individuals = rng.random_range(-10..2_000_000);
            MigrationRecord::new(country, origin, population_type, date, individuals)
        })
        .collect();

    let mut destinations = Vec::new();
    let mut origins = Vec::new();
    for (i, country) in COUNTRIES.iter().enumerate() {
        let no = Some(i64::try_from(i).unwrap());
        if rng.random_bool(0.7) {
            destinations.push(GeoPoint {
                no,
                country: (*country).to_string(),
                lat: rng.random_range(-30.0..30.0),
                lon: rng.random_range(-20.0..50.0),
            });
        }
        if rng.random_bool(0.7) {
            origins.push(OriginGeoPoint {
                no,
                country_of_origin: (*country).to_string(),
                latitude: rng.random_range(-30.0..30.0),
                longitude: rng.random_range(-20.0..50.0),
            });
        }
    }

    InputTables {
        records,
        destinations,
        origins,
    }
}

fn run(seed: u64) -> (InputTables, Pipeline) {
    let tables = random_tables(seed, 400);
    let pipeline = Pipeline::from_tables(&tables, &PipelineConfig::default()).unwrap();
    (tables, pipeline)
}

#[test]
fn test_grouped_sums_agree() {
    for seed in 0..8 {
        let (tables, pipeline) = run(seed);
        let expected: i64 = tables
            .records
            .iter()
            .filter(|r| r.individuals > 0)
            .map(|r| r.individuals)
            .sum();

        assert_eq!(total(&pipeline.by_country), expected);
        assert_eq!(total(&pipeline.by_origin), expected);
        assert_eq!(total(&pipeline.by_population_type), expected);
        assert_eq!(total(&pipeline.by_date), expected);
        assert_eq!(pipeline.summary.total_migrants, expected);
        assert!(pipeline.by_country.iter().all(|r| r.individuals >= 0));
    }
}

#[test]
fn test_points_only_for_known_coordinates() {
    for seed in 0..8 {
        let (tables, pipeline) = run(seed);
        let destinations: BTreeSet<&str> =
            tables.destinations.iter().map(|g| g.country.as_str()).collect();
        let origins: BTreeSet<&str> = tables
            .origins
            .iter()
            .map(|g| g.country_of_origin.as_str())
            .collect();

        for point in &pipeline.destination_points {
            assert!(destinations.contains(point.label()));
            let aggregate = pipeline
                .by_country
                .iter()
                .find(|r| r.key == point.label())
                .unwrap();
            assert_eq!(aggregate.individuals, point.individuals);
        }
        for point in &pipeline.origin_points {
            assert!(origins.contains(point.label()));
        }

        for edge in &pipeline.flow_edges {
            assert!(destinations.contains(edge.country.as_str()));
            assert!(origins.contains(edge.country_of_origin.as_str()));
            assert!(edge.individuals > 10_000);
        }

        let joined_total: usize = pipeline.joined.len();
        let matched = tables
            .records
            .iter()
            .filter(|r| destinations.contains(r.country.as_str()))
            .filter(|r| origins.contains(r.country_of_origin.as_str()))
            .count();
        assert_eq!(joined_total, matched);
    }
}

#[test]
fn test_placeholders_never_displayed() {
    for seed in 0..8 {
        let (_, pipeline) = run(seed);
        let data = pipeline.present(&Selection::new(["Others", "Chad"], ["Various", "Sudan"]));

        let placeholder = |label: &str| label == "Others" || label == "Various";
        assert!(!data.destination_points.iter().any(|p| placeholder(p.label())));
        assert!(!data.origin_points.iter().any(|p| placeholder(p.label())));
        assert!(!data.selected_destinations.iter().any(|p| placeholder(p.label())));
        assert!(!data.selected_origins.iter().any(|p| placeholder(p.label())));
        assert!(!data.destination_options.iter().any(|o| placeholder(o.as_str())));
        assert!(
            !data
                .flow_edges
                .iter()
                .any(|e| placeholder(e.country.as_str()) || placeholder(e.country_of_origin.as_str()))
        );
    }
}

#[test]
fn test_threshold_and_selection() {
    for seed in 0..8 {
        let (_, pipeline) = run(seed);

        let defaults = pipeline.selected_destinations(&Selection::default());
        assert!(defaults.iter().all(|p| p.individuals > 1_500_000));
        let expected = pipeline
            .destination_points
            .iter()
            .filter(|p| p.individuals > 1_500_000)
            .count();
        assert_eq!(defaults.len(), expected);

        let wanted: BTreeSet<String> = ["Chad", "Kenya", "Atlantis"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let selection = Selection::new(wanted.iter().cloned(), Vec::<String>::new());
        let selected = pipeline.selected_destinations(&selection);
        assert!(selected.iter().all(|p| wanted.contains(p.label())));
        let available = pipeline
            .destination_points
            .iter()
            .filter(|p| wanted.contains(p.label()))
            .count();
        assert_eq!(selected.len(), available);
        assert!(
            selected
                .windows(2)
                .all(|w| w[0].individuals >= w[1].individuals)
        );
    }
}

#[test]
fn test_same_input_same_output() {
    let a = run(42).1;
    let b = run(42).1;
    let selection = Selection::default();
    assert_eq!(
        serde_json::to_string(&a.present(&selection)).unwrap(),
        serde_json::to_string(&b.present(&selection)).unwrap()
    );
}
