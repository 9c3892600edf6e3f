//! End-to-end pipeline run
//!
//! load → normalize → join → aggregate → filter. The result is an immutable
//! [`Pipeline`] value; selections are applied on demand by
//! [`Pipeline::present`] without touching it.

use std::time::Instant;

use serde::Serialize;

use crate::algorithm::aggregate::{
    by_country, by_date, by_origin, by_population_type, map_points, sort_by_individuals_desc,
};
use crate::algorithm::join::{JoinStats, JoinedRecord, flow_edges, join_destinations, join_origins};
use crate::algorithm::summary::SummaryTotals;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::filter::{PlaceholderFilter, PointFilter, Selection, select_points, selection_options};
use crate::loader::{InputTables, load_inputs};
use crate::models::{AggregateRow, DateKey, FlowEdge, GeoPoint, MapPoint, OriginGeoPoint, PopulationType};

/// Everything computed from one set of input tables
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    /// Headline totals
    pub summary: SummaryTotals,
    /// Total per destination country, over all records
    pub by_country: Vec<AggregateRow<String>>,
    /// Total per country of origin, over all records
    pub by_origin: Vec<AggregateRow<String>>,
    /// Total per population type
    pub by_population_type: Vec<AggregateRow<PopulationType>>,
    /// Total per reporting date
    pub by_date: Vec<AggregateRow<DateKey>>,
    /// Destination points in coordinate-table order, placeholders removed
    pub destination_points: Vec<MapPoint<GeoPoint>>,
    /// Destination points by Individuals, largest first
    pub destination_ranking: Vec<MapPoint<GeoPoint>>,
    /// Origin points in coordinate-table order, placeholders removed
    pub origin_points: Vec<MapPoint<OriginGeoPoint>>,
    /// Records carrying both destination and origin coordinates
    pub joined: Vec<JoinedRecord>,
    /// Row-level flow edges above the flow threshold, placeholders removed
    pub flow_edges: Vec<FlowEdge>,
    /// Audit of every inner join performed
    pub joins: Vec<JoinStats>,
}

/// What the presentation layer receives for one selection
#[derive(Debug, Clone, Serialize)]
pub struct PresentationData<'a> {
    pub summary: &'a SummaryTotals,
    pub by_country: &'a [AggregateRow<String>],
    pub by_origin: &'a [AggregateRow<String>],
    pub by_population_type: &'a [AggregateRow<PopulationType>],
    pub by_date: &'a [AggregateRow<DateKey>],
    pub destination_points: &'a [MapPoint<GeoPoint>],
    pub origin_points: &'a [MapPoint<OriginGeoPoint>],
    pub flow_edges: &'a [FlowEdge],
    pub selected_destinations: Vec<MapPoint<GeoPoint>>,
    pub selected_origins: Vec<MapPoint<OriginGeoPoint>>,
    pub destination_options: Vec<String>,
    pub origin_options: Vec<String>,
    pub joins: &'a [JoinStats],
}

impl Pipeline {
    /// Run every stage after loading over already typed tables
    pub fn from_tables(tables: &InputTables, config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::compute(tables, config))
    }

    /// Join, aggregate and filter; `config` must already be validated
    fn compute(tables: &InputTables, config: &PipelineConfig) -> Self {
        let start = Instant::now();
        let placeholders = PlaceholderFilter::new(config.placeholders.clone());

        let summary = SummaryTotals::from_records(&tables.records, &config.focus);

        let with_destinations = join_destinations(&tables.records, &tables.destinations);
        let with_origins = join_origins(&with_destinations.rows, &tables.origins);
        let edges = flow_edges(&with_origins.rows, config.flow_threshold);
        let flow_edges = placeholders.apply(edges.as_slice());

        let by_country = by_country(&tables.records);
        let by_origin = by_origin(&tables.records);
        let by_population_type = by_population_type(&tables.records);
        let by_date = by_date(&tables.records);

        let destination_map = map_points(
            "destination aggregate x destinations",
            &tables.destinations,
            &by_country,
            config.destination_size_divisor,
        );
        let origin_map = map_points(
            "origin aggregate x origins",
            &tables.origins,
            &by_origin,
            config.origin_size_divisor,
        );

        let destination_points = placeholders.apply(destination_map.rows.as_slice());
        let origin_points = placeholders.apply(origin_map.rows.as_slice());
        log::debug!(
            "Excluded {} destination and {} origin placeholder points",
            destination_map.rows.len() - destination_points.len(),
            origin_map.rows.len() - origin_points.len()
        );
        let destination_ranking = sort_by_individuals_desc(&destination_points);

        let joins = vec![
            with_destinations.stats,
            with_origins.stats,
            destination_map.stats,
            origin_map.stats,
        ];

        log::info!(
            "Pipeline computed {} destination points, {} origin points and {} flow edges in {:?}",
            destination_points.len(),
            origin_points.len(),
            flow_edges.len(),
            start.elapsed()
        );

        Self {
            config: config.clone(),
            summary,
            by_country,
            by_origin,
            by_population_type,
            by_date,
            destination_points,
            destination_ranking,
            origin_points,
            joined: with_origins.rows,
            flow_edges,
            joins,
        }
    }

    /// Destination points to display for a selection, largest first
    #[must_use]
    pub fn selected_destinations(&self, selection: &Selection) -> Vec<MapPoint<GeoPoint>> {
        select_points(
            &self.destination_ranking,
            &selection.destinations,
            &self.config.destination_default,
        )
    }

    /// Origin points to display for a selection
    #[must_use]
    pub fn selected_origins(&self, selection: &Selection) -> Vec<MapPoint<OriginGeoPoint>> {
        select_points(
            &self.origin_points,
            &selection.origins,
            &self.config.origin_default,
        )
    }

    /// Assemble the presentation hand-off for a selection
    #[must_use]
    pub fn present(&self, selection: &Selection) -> PresentationData<'_> {
        PresentationData {
            summary: &self.summary,
            by_country: &self.by_country,
            by_origin: &self.by_origin,
            by_population_type: &self.by_population_type,
            by_date: &self.by_date,
            destination_points: &self.destination_points,
            origin_points: &self.origin_points,
            flow_edges: &self.flow_edges,
            selected_destinations: self.selected_destinations(selection),
            selected_origins: self.selected_origins(selection),
            destination_options: selection_options(&self.destination_ranking),
            origin_options: selection_options(&self.origin_points),
            joins: &self.joins,
        }
    }
}

/// Load the inputs named by `config` and run the full pipeline
pub fn run_pipeline(config: &PipelineConfig) -> Result<Pipeline> {
    config.validate()?;
    log::debug!("{config}");
    let tables = load_inputs(config)?;
    Ok(Pipeline::compute(&tables, config))
}
