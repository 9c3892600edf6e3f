//! Error handling for the migration pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can occur while loading, normalizing or joining the input tables
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Error opening or reading a file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// File the operation was performed on
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// An expected column is absent from an input table
    #[error("{table}: missing expected column '{column}' (found: {found})")]
    MissingColumn {
        /// Name or path of the table being checked
        table: String,
        /// Column that was expected
        column: String,
        /// Columns that were actually present, comma separated
        found: String,
    },

    /// A column could not be converted to its canonical type
    #[error("{table}: column '{column}' could not be converted: {detail}")]
    Conversion {
        /// Name or path of the table being converted
        table: String,
        /// Column that failed
        column: String,
        /// Description of the failure
        detail: String,
    },

    /// Typed rows could not be extracted from a record batch
    #[error("{table}: failed to deserialize rows: {detail}")]
    Deserialize {
        /// Name or path of the table being deserialized
        table: String,
        /// Description of the failure
        detail: String,
    },

    /// The input file has an extension the loader does not understand
    #[error("Unsupported input format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    /// Build an IO error bound to the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a missing-column error from the columns that were present
    pub fn missing_column<'a>(
        table: impl Into<String>,
        column: impl Into<String>,
        found: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
            found: found
                .into_iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
