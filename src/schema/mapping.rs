//! Strict column renaming for input tables
//!
//! A [`SchemaMapping`] is an ordered list of `{source, target}` renames that is
//! validated eagerly against the loaded schema: every source column must be
//! present, otherwise the table is rejected. A silent miss here would turn into
//! an empty join further down the pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::datatypes::{Field, FieldRef, Schema};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::models::geo::{LAT, LATITUDE, LON, LONGITUDE, NO};
use crate::models::record::{COUNTRY, COUNTRY_OF_ORIGIN};

/// Source name standing for the unnamed index column written by dataframe exports
pub const ANONYMOUS_INDEX: &str = "";

/// Header names that an unnamed index column shows up as
const ANONYMOUS_INDEX_ALIASES: &[&str] = &["", "Unnamed: 0"];

/// A single column rename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub source: String,
    pub target: String,
}

impl ColumnRename {
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    fn matches(&self, column: &str) -> bool {
        if self.source == ANONYMOUS_INDEX {
            ANONYMOUS_INDEX_ALIASES.contains(&column)
        } else {
            self.source == column
        }
    }
}

/// Ordered set of renames applied to one table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMapping {
    renames: Vec<ColumnRename>,
}

impl SchemaMapping {
    /// Build a mapping from `(source, target)` pairs
    #[must_use]
    pub fn new<S: Into<String>, T: Into<String>>(pairs: impl IntoIterator<Item = (S, T)>) -> Self {
        Self {
            renames: pairs
                .into_iter()
                .map(|(source, target)| ColumnRename::new(source, target))
                .collect(),
        }
    }

    /// Mapping for the destination coordinate table: `<index>, country, lat, long`
    #[must_use]
    pub fn destination() -> Self {
        Self::new([
            (ANONYMOUS_INDEX, NO),
            ("country", COUNTRY),
            ("lat", LAT),
            ("long", LON),
        ])
    }

    /// Mapping for the origin coordinate table: `<index>, country, latitude, longitude`
    #[must_use]
    pub fn origin() -> Self {
        Self::new([
            (ANONYMOUS_INDEX, NO),
            ("country", COUNTRY_OF_ORIGIN),
            ("latitude", LATITUDE),
            ("longitude", LONGITUDE),
        ])
    }

    /// Reject mappings that would produce ambiguous columns
    pub fn validate(&self) -> Result<()> {
        let mut sources = HashSet::new();
        let mut targets = HashSet::new();
        for rename in &self.renames {
            if !sources.insert(rename.source.as_str()) {
                return Err(PipelineError::Config(format!(
                    "column '{}' is renamed more than once",
                    rename.source
                )));
            }
            if rename.target.is_empty() || !targets.insert(rename.target.as_str()) {
                return Err(PipelineError::Config(format!(
                    "rename target '{}' is empty or used more than once",
                    rename.target
                )));
            }
        }
        Ok(())
    }

    /// Apply the renames to a schema
    ///
    /// Fails on the first rename whose source column is absent.
    pub fn apply_to_schema(&self, schema: &Schema, table: &str) -> Result<Schema> {
        let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();

        for rename in &self.renames {
            let idx = schema
                .fields()
                .iter()
                .position(|f| rename.matches(f.name()))
                .ok_or_else(|| {
                    PipelineError::missing_column(
                        table,
                        display_source(&rename.source),
                        schema.fields().iter().map(|f| f.name().as_str()),
                    )
                })?;

            let renamed: Field = fields[idx].as_ref().clone().with_name(rename.target.clone());
            fields[idx] = Arc::new(renamed);
        }

        let renamed = Schema::new_with_metadata(fields, schema.metadata().clone());
        check_unique_names(&renamed, table)?;
        Ok(renamed)
    }

    /// Apply the renames to a record batch
    pub fn normalize_batch(&self, batch: &RecordBatch, table: &str) -> Result<RecordBatch> {
        let schema = self.apply_to_schema(batch.schema_ref(), table)?;
        log::debug!(
            "Normalized {table}: [{}]",
            schema
                .fields()
                .iter()
                .map(|f| f.name().as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(RecordBatch::try_new(Arc::new(schema), batch.columns().to_vec())?)
    }
}

fn display_source(source: &str) -> String {
    if source == ANONYMOUS_INDEX {
        "<index>".to_string()
    } else {
        source.to_string()
    }
}

fn check_unique_names(schema: &Schema, table: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for field in schema.fields() {
        if !seen.insert(field.name().as_str()) {
            return Err(PipelineError::Conversion {
                table: table.to_string(),
                column: field.name().clone(),
                detail: "column name appears more than once after renaming".to_string(),
            });
        }
    }
    Ok(())
}
