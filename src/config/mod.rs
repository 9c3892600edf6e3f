//! Configuration for the migration pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::error::util::safe_open_file;
use crate::schema::SchemaMapping;

/// Aggregate rows that are rollups rather than places
pub const DEFAULT_PLACEHOLDERS: &[&str] = &["Others", "Various"];

/// Default head-count threshold for the empty-selection fallback
pub const DEFAULT_SELECTION_THRESHOLD: i64 = 1_500_000;

/// Default row-level head-count threshold for flow edges
pub const DEFAULT_FLOW_THRESHOLD: i64 = 10_000;

/// What to show when the user has not selected any countries
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum DefaultSelection {
    /// Keep points whose head count is strictly above the threshold
    Threshold { min_individuals: i64 },
    /// Keep a fixed list of countries
    AllowList { countries: Vec<String> },
}

impl Default for DefaultSelection {
    fn default() -> Self {
        Self::Threshold {
            min_individuals: DEFAULT_SELECTION_THRESHOLD,
        }
    }
}

impl fmt::Display for DefaultSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threshold { min_individuals } => write!(f, "Individuals > {min_individuals}"),
            Self::AllowList { countries } => write!(f, "one of [{}]", countries.join(", ")),
        }
    }
}

/// Country whose outflow is broken down in the summary totals
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FocusCountry {
    /// Country of origin to report on
    pub country: String,
    /// Hosting countries reported individually, in display order
    pub neighbours: Vec<String>,
}

impl Default for FocusCountry {
    fn default() -> Self {
        Self {
            country: "Sudan".to_string(),
            neighbours: vec![
                "Chad".to_string(),
                "Ethiopia".to_string(),
                "Central African Republic".to_string(),
                "South Sudan".to_string(),
            ],
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Primary UNHCR record table
    pub records_path: PathBuf,
    /// Destination-country coordinate table
    pub destinations_path: PathBuf,
    /// Origin-country coordinate table
    pub origins_path: PathBuf,
    /// Renames applied to the destination coordinate table
    pub destination_mapping: SchemaMapping,
    /// Renames applied to the origin coordinate table
    pub origin_mapping: SchemaMapping,
    /// Divisor turning destination head counts into point sizes
    pub destination_size_divisor: f64,
    /// Divisor turning origin head counts into point sizes
    pub origin_size_divisor: f64,
    /// Rows at or below this head count produce no flow edge
    pub flow_threshold: i64,
    /// Labels excluded from every displayed point set and flow edge
    pub placeholders: Vec<String>,
    /// Empty-selection fallback for destination points
    pub destination_default: DefaultSelection,
    /// Empty-selection fallback for origin points
    pub origin_default: DefaultSelection,
    /// Focus-country breakdown
    pub focus: FocusCountry,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            records_path: PathBuf::from("data/unhcr.csv"),
            destinations_path: PathBuf::from("data/Geolocation.csv"),
            origins_path: PathBuf::from("data/origin.csv"),
            destination_mapping: SchemaMapping::destination(),
            origin_mapping: SchemaMapping::origin(),
            destination_size_divisor: 50.0,
            origin_size_divisor: 100.0,
            flow_threshold: DEFAULT_FLOW_THRESHOLD,
            placeholders: DEFAULT_PLACEHOLDERS.iter().map(ToString::to_string).collect(),
            destination_default: DefaultSelection::default(),
            origin_default: DefaultSelection::default(),
            focus: FocusCountry::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; absent keys take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "reading pipeline configuration")?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| PipelineError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before any input is read
    pub fn validate(&self) -> Result<()> {
        for (name, divisor) in [
            ("destination_size_divisor", self.destination_size_divisor),
            ("origin_size_divisor", self.origin_size_divisor),
        ] {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err(PipelineError::Config(format!(
                    "{name} must be a positive number, got {divisor}"
                )));
            }
        }

        if self.flow_threshold < 0 {
            return Err(PipelineError::Config(format!(
                "flow_threshold must not be negative, got {}",
                self.flow_threshold
            )));
        }

        for selection in [&self.destination_default, &self.origin_default] {
            if let DefaultSelection::AllowList { countries } = selection {
                if countries.is_empty() {
                    return Err(PipelineError::Config(
                        "allow_list default selection needs at least one country".to_string(),
                    ));
                }
            }
        }

        self.destination_mapping.validate()?;
        self.origin_mapping.validate()?;
        Ok(())
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Records: {}", self.records_path.display())?;
        writeln!(f, "  Destination coordinates: {}", self.destinations_path.display())?;
        writeln!(f, "  Origin coordinates: {}", self.origins_path.display())?;
        writeln!(
            f,
            "  Size divisors: destination {}, origin {}",
            self.destination_size_divisor, self.origin_size_divisor
        )?;
        writeln!(f, "  Flow threshold: Individuals > {}", self.flow_threshold)?;
        writeln!(f, "  Placeholders: {}", self.placeholders.join(", "))?;
        writeln!(f, "  Destination default: {}", self.destination_default)?;
        writeln!(f, "  Origin default: {}", self.origin_default)?;
        writeln!(
            f,
            "  Focus: {} -> {}",
            self.focus.country,
            self.focus.neighbours.join(", ")
        )?;
        Ok(())
    }
}
