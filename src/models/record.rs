//! Migration record model
//!
//! One row of the primary UNHCR dataset. Field names on the serde side are
//! the canonical column names so rows can be pulled straight out of a
//! normalized record batch with `serde_arrow`.

use serde::{Deserialize, Serialize};

use crate::models::types::PopulationType;

/// Canonical column holding the destination country
pub const COUNTRY: &str = "Country";
/// Canonical column holding the country of origin
pub const COUNTRY_OF_ORIGIN: &str = "Country of Origin";
/// Canonical column holding the population type
pub const POPULATION_TYPE: &str = "Population type";
/// Canonical column holding the reporting date
pub const DATE: &str = "Date";
/// Canonical column holding the head count
pub const INDIVIDUALS: &str = "Individuals";

/// A row in the primary dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Destination (hosting) country
    #[serde(rename = "Country")]
    pub country: String,
    /// Country the people came from
    #[serde(rename = "Country of Origin")]
    pub country_of_origin: String,
    /// Population category
    #[serde(rename = "Population type")]
    pub population_type: PopulationType,
    /// Reporting date label
    #[serde(rename = "Date")]
    pub date: String,
    /// Number of people represented by this row
    #[serde(rename = "Individuals")]
    pub individuals: i64,
}

impl MigrationRecord {
    /// Create a new record
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        country_of_origin: impl Into<String>,
        population_type: impl Into<PopulationType>,
        date: impl Into<String>,
        individuals: i64,
    ) -> Self {
        Self {
            country: country.into(),
            country_of_origin: country_of_origin.into(),
            population_type: population_type.into(),
            date: date.into(),
            individuals,
        }
    }

    /// Whether the row contributes to totals
    #[must_use]
    pub const fn counts(&self) -> bool {
        self.individuals > 0
    }
}
