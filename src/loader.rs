//! Input table loading
//!
//! Reads the primary record table and the two coordinate lookup tables into
//! Arrow record batches, normalizes their schemas and pulls typed rows out with
//! `serde_arrow`. CSV and Parquet inputs are both accepted; any failure here is
//! fatal for the run.

use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;

use crate::config::PipelineConfig;
use crate::error::util::safe_open_file;
use crate::error::{PipelineError, Result};
use crate::models::{GeoPoint, MigrationRecord, OriginGeoPoint};
use crate::schema::{
    ColumnSpec, DESTINATION_COLUMNS, ORIGIN_COLUMNS, RECORD_COLUMNS, SchemaMapping, conform,
};
use crate::utils::logging::{log_empty_table, log_table_loaded, log_table_loading};

/// Batch size for CSV reading
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// The three input tables, typed
#[derive(Debug, Clone, Default)]
pub struct InputTables {
    pub records: Vec<MigrationRecord>,
    pub destinations: Vec<GeoPoint>,
    pub origins: Vec<OriginGeoPoint>,
}

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Csv,
    Parquet,
}

impl InputFormat {
    fn detect(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("parquet") => Ok(Self::Parquet),
            _ => Err(PipelineError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read a whole table into a single record batch
///
/// CSV columns are all read as `Utf8`; typing happens after normalization so
/// that numeric parse failures name the canonical column.
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    match InputFormat::detect(path)? {
        InputFormat::Csv => read_csv(path),
        InputFormat::Parquet => read_parquet(path),
    }
}

/// Read a CSV file with a header row
pub fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut file = safe_open_file(path, "reading CSV table")?;

    let format = Format::default().with_header(true);
    let (header, _) = format.infer_schema(&mut file, Some(0))?;
    file.rewind().map_err(|e| PipelineError::io(path, e))?;

    // Every column as text; casting happens once the names are canonical
    let schema: SchemaRef = Arc::new(Schema::new(
        header
            .fields()
            .iter()
            .map(|f| Field::new(f.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Read a Parquet file
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = safe_open_file(path, "reading parquet table")?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Pull typed rows out of a normalized batch
fn deserialize_rows<T: DeserializeOwned>(batch: &RecordBatch, table: &str) -> Result<Vec<T>> {
    serde_arrow::from_record_batch::<Vec<T>>(batch).map_err(|e| PipelineError::Deserialize {
        table: table.to_string(),
        detail: e.to_string(),
    })
}

/// Read, rename, conform and deserialize one table
fn load_typed<T: DeserializeOwned>(
    path: &Path,
    mapping: Option<&SchemaMapping>,
    columns: &[ColumnSpec],
    what: &str,
) -> Result<Vec<T>> {
    log_table_loading(what, path);
    let start = Instant::now();
    let table = path.display().to_string();

    let raw = read_table(path)?;
    let normalized = match mapping {
        Some(mapping) => mapping.normalize_batch(&raw, &table)?,
        None => raw,
    };
    let conformed = conform(&normalized, columns, &table)?;
    let rows: Vec<T> = deserialize_rows(&conformed, &table)?;

    if rows.is_empty() {
        log_empty_table(what, path);
    }
    log_table_loaded(what, path, rows.len(), start.elapsed());
    Ok(rows)
}

/// Load the primary migration record table
pub fn load_records(path: &Path) -> Result<Vec<MigrationRecord>> {
    load_typed(path, None, RECORD_COLUMNS, "migration records")
}

/// Load the destination-country coordinate table
pub fn load_destinations(path: &Path, mapping: &SchemaMapping) -> Result<Vec<GeoPoint>> {
    load_typed(path, Some(mapping), DESTINATION_COLUMNS, "destination coordinates")
}

/// Load the origin-country coordinate table
pub fn load_origins(path: &Path, mapping: &SchemaMapping) -> Result<Vec<OriginGeoPoint>> {
    load_typed(path, Some(mapping), ORIGIN_COLUMNS, "origin coordinates")
}

/// Load all three input tables named by `config`
pub fn load_inputs(config: &PipelineConfig) -> Result<InputTables> {
    Ok(InputTables {
        records: load_records(&config.records_path)?,
        destinations: load_destinations(&config.destinations_path, &config.destination_mapping)?,
        origins: load_origins(&config.origins_path, &config.origin_mapping)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_csv_columns_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "t.csv", ",country,lat,long\n0,Chad,15.4,18.7\n");
        let batch = read_csv(&path).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 4);
        for field in batch.schema().fields() {
            assert_eq!(field.data_type(), &DataType::Utf8);
        }
        assert_eq!(batch.schema().field(0).name(), "");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_table(Path::new("data/unhcr.xlsx")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }

    #[test]
    fn loads_typed_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "unhcr.csv",
            "Country,Country of Origin,Population type,Date,Individuals\n\
             Chad,Sudan,Refugees,2024-01-31,300000\n\
             Kenya,Somalia,Asylum-Seekers,2024-01-31,12\n",
        );
        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, "Chad");
        assert_eq!(records[0].individuals, 300_000);
        assert_eq!(
            records[1].population_type,
            crate::models::PopulationType::AsylumSeekers
        );
    }

    #[test]
    fn non_numeric_individuals_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "unhcr.csv",
            "Country,Country of Origin,Population type,Date,Individuals\n\
             Chad,Sudan,Refugees,2024-01-31,lots\n",
        );
        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("Individuals"));
    }

    #[test]
    fn missing_coordinate_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "geo.csv", ",country,lat,long\n0,Chad,,18.7\n");
        assert!(load_destinations(&path, &SchemaMapping::destination()).is_err());
    }
}
