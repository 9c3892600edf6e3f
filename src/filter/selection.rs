//! Selection filters for displayed point sets
//!
//! A user selection narrows a point set to exactly the named countries. With
//! nothing selected the configured [`DefaultSelection`] applies instead.

use std::collections::BTreeSet;
use std::fmt::Debug;

use itertools::Itertools;
use serde::Deserialize;

use crate::config::DefaultSelection;
use crate::models::{FlowEdge, Located, MapPoint};

/// A filter that decides, item by item, what stays
pub trait PointFilter<T>: Debug {
    /// Whether `item` is kept
    fn keep(&self, item: &T) -> bool;

    /// Apply the filter, preserving input order
    fn apply(&self, items: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        items.iter().filter(|item| self.keep(item)).cloned().collect()
    }
}

/// Keep exactly the named countries
#[derive(Debug, Clone, Default)]
pub struct SelectionFilter {
    names: BTreeSet<String>,
}

impl SelectionFilter {
    #[must_use]
    pub const fn new(names: BTreeSet<String>) -> Self {
        Self { names }
    }
}

impl<G: Located> PointFilter<MapPoint<G>> for SelectionFilter {
    fn keep(&self, item: &MapPoint<G>) -> bool {
        self.names.contains(item.label())
    }
}

/// Keep points strictly above a head count
#[derive(Debug, Clone, Copy)]
pub struct ThresholdFilter {
    pub min_individuals: i64,
}

impl<G: Located> PointFilter<MapPoint<G>> for ThresholdFilter {
    fn keep(&self, item: &MapPoint<G>) -> bool {
        item.individuals > self.min_individuals
    }
}

/// Keep a fixed list of countries
#[derive(Debug, Clone)]
pub struct AllowListFilter {
    countries: Vec<String>,
}

impl AllowListFilter {
    #[must_use]
    pub const fn new(countries: Vec<String>) -> Self {
        Self { countries }
    }
}

impl<G: Located> PointFilter<MapPoint<G>> for AllowListFilter {
    fn keep(&self, item: &MapPoint<G>) -> bool {
        self.countries.iter().any(|c| c == item.label())
    }
}

/// Drop aggregate rollups such as "Others" or "Various"
#[derive(Debug, Clone)]
pub struct PlaceholderFilter {
    placeholders: Vec<String>,
}

impl PlaceholderFilter {
    #[must_use]
    pub const fn new(placeholders: Vec<String>) -> Self {
        Self { placeholders }
    }

    fn is_placeholder(&self, label: &str) -> bool {
        self.placeholders.iter().any(|p| p == label)
    }
}

impl<G: Located> PointFilter<MapPoint<G>> for PlaceholderFilter {
    fn keep(&self, item: &MapPoint<G>) -> bool {
        !self.is_placeholder(item.label())
    }
}

impl PointFilter<FlowEdge> for PlaceholderFilter {
    fn keep(&self, item: &FlowEdge) -> bool {
        !self.is_placeholder(&item.country_of_origin) && !self.is_placeholder(&item.country)
    }
}

/// The filter the configured default policy stands for
#[derive(Debug)]
pub enum DefaultFilter {
    Threshold(ThresholdFilter),
    AllowList(AllowListFilter),
}

impl From<&DefaultSelection> for DefaultFilter {
    fn from(policy: &DefaultSelection) -> Self {
        match policy {
            DefaultSelection::Threshold { min_individuals } => Self::Threshold(ThresholdFilter {
                min_individuals: *min_individuals,
            }),
            DefaultSelection::AllowList { countries } => {
                Self::AllowList(AllowListFilter::new(countries.clone()))
            }
        }
    }
}

impl<G: Located> PointFilter<MapPoint<G>> for DefaultFilter {
    fn keep(&self, item: &MapPoint<G>) -> bool {
        match self {
            Self::Threshold(f) => f.keep(item),
            Self::AllowList(f) => f.keep(item),
        }
    }
}

/// Countries picked by the user for each point set
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selection {
    pub destinations: BTreeSet<String>,
    pub origins: BTreeSet<String>,
}

impl Selection {
    /// Build a selection from any string iterables
    pub fn new<D, O>(destinations: D, origins: O) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            destinations: destinations.into_iter().map(Into::into).collect(),
            origins: origins.into_iter().map(Into::into).collect(),
        }
    }
}

/// Narrow a point set to the selection, or to the default policy when the
/// selection is empty
#[must_use]
pub fn select_points<G>(
    points: &[MapPoint<G>],
    selected: &BTreeSet<String>,
    default: &DefaultSelection,
) -> Vec<MapPoint<G>>
where
    G: Located + Clone,
{
    if selected.is_empty() {
        let filter = DefaultFilter::from(default);
        let kept = filter.apply(points);
        log::debug!(
            "No countries selected, default policy ({default}) kept {} of {} points",
            kept.len(),
            points.len()
        );
        kept
    } else {
        SelectionFilter::new(selected.clone()).apply(points)
    }
}

/// Distinct labels of a point set, in display order
#[must_use]
pub fn selection_options<G: Located>(points: &[MapPoint<G>]) -> Vec<String> {
    points
        .iter()
        .map(|p| p.label().to_string())
        .unique()
        .collect()
}
