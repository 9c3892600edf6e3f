//! Filtering of displayed subsets
//!
//! This module narrows the aggregated point sets to what is actually shown:
//! user selections, the empty-selection default policy and placeholder
//! exclusion.

pub mod selection;

pub use selection::{
    AllowListFilter, DefaultFilter, PlaceholderFilter, PointFilter, Selection, SelectionFilter,
    ThresholdFilter, select_points, selection_options,
};
