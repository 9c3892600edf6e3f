//! Common domain type definitions
//!
//! This module contains the categorical and key types shared by the
//! record, aggregate and map-point models.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Categorical label of a migration record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PopulationType {
    /// "Refugees"
    Refugees,
    /// "Asylum-Seekers"
    AsylumSeekers,
    /// Any other label, kept verbatim
    Other(String),
}

impl PopulationType {
    /// The label as it appears in the source data
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Refugees => "Refugees",
            Self::AsylumSeekers => "Asylum-Seekers",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for PopulationType {
    fn from(s: &str) -> Self {
        match s {
            "Refugees" => Self::Refugees,
            "Asylum-Seekers" => Self::AsylumSeekers,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PopulationType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Refugees" => Self::Refugees,
            "Asylum-Seekers" => Self::AsylumSeekers,
            _ => Self::Other(s),
        }
    }
}

impl From<PopulationType> for String {
    fn from(value: PopulationType) -> Self {
        match value {
            PopulationType::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PopulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date formats tried, in order, when ordering date labels
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y", "%d/%m/%Y"];

/// Grouping key for the by-date aggregate
///
/// Orders chronologically when the label parses as a date, otherwise
/// lexicographically after all parsed dates. Serializes as the raw label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey {
    // 0 for parsed dates, 1 otherwise; compared first
    rank: u8,
    parsed: Option<NaiveDate>,
    label: String,
}

impl DateKey {
    /// Build a key from a raw date label
    #[must_use]
    pub fn new(label: &str) -> Self {
        let parsed = parse_date_label(label.trim());
        Self {
            rank: u8::from(parsed.is_none()),
            parsed,
            label: label.to_string(),
        }
    }

    /// The raw label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Parse a date label, accepting year-month labels as the first of the month
fn parse_date_label(label: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(label, fmt).ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d").ok())
}
