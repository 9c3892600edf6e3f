//! Column checks, casts and projection for normalized tables.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::FormatOptions;

use crate::error::{PipelineError, Result};

/// A column every row of a table must carry, with its canonical type
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub data_type: DataType,
    /// Whether empty cells are allowed to stay null
    pub nullable: bool,
}

impl ColumnSpec {
    /// A column whose cells must all be present
    ///
    /// Empty text cells read as `""`; an empty cell in any other type is an
    /// error.
    #[must_use]
    pub const fn new(name: &'static str, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            nullable: false,
        }
    }

    /// A column whose empty cells stay null
    #[must_use]
    pub const fn optional(name: &'static str, data_type: DataType) -> Self {
        Self {
            name,
            data_type,
            nullable: true,
        }
    }
}

/// Fail if any of `columns` is absent from `schema`
pub fn require_columns<'a>(
    schema: &Schema,
    columns: impl IntoIterator<Item = &'a str>,
    table: &str,
) -> Result<()> {
    for column in columns {
        if schema.index_of(column).is_err() {
            return Err(PipelineError::missing_column(
                table,
                column,
                schema.fields().iter().map(|f| f.name().as_str()),
            ));
        }
    }
    Ok(())
}

/// Keep only `columns`, in that order, cast to their canonical types
///
/// Casting is strict: a cell that cannot be parsed into the target type is an
/// error rather than a null. Empty cells follow [`ColumnSpec::new`] and
/// [`ColumnSpec::optional`].
pub fn conform(batch: &RecordBatch, columns: &[ColumnSpec], table: &str) -> Result<RecordBatch> {
    let schema = batch.schema_ref();
    require_columns(schema, columns.iter().map(|c| c.name), table)?;

    let options = CastOptions {
        safe: false,
        format_options: FormatOptions::default(),
    };

    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());

    for spec in columns {
        let idx = schema.index_of(spec.name)?;
        let array = batch.column(idx);
        let converted = if array.data_type() == &spec.data_type {
            Arc::clone(array)
        } else {
            cast_with_options(array, &spec.data_type, &options).map_err(|e| {
                PipelineError::Conversion {
                    table: table.to_string(),
                    column: spec.name.to_string(),
                    detail: e.to_string(),
                }
            })?
        };
        let converted = fill_nulls(converted, spec, table)?;
        fields.push(Field::new(spec.name, spec.data_type.clone(), true));
        arrays.push(converted);
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

/// Apply the empty-cell policy of `spec` to a converted column
fn fill_nulls(array: ArrayRef, spec: &ColumnSpec, table: &str) -> Result<ArrayRef> {
    if spec.nullable || array.null_count() == 0 {
        return Ok(array);
    }

    if let Some(text) = array.as_string_opt::<i32>() {
        let filled: StringArray = text.iter().map(|v| Some(v.unwrap_or(""))).collect();
        return Ok(Arc::new(filled));
    }

    // Data rows are numbered from 1, after the header
    let row = (0..array.len()).find(|&i| array.is_null(i)).unwrap_or(0) + 1;
    Err(PipelineError::Conversion {
        table: table.to_string(),
        column: spec.name.to_string(),
        detail: format!("empty value in data row {row}"),
    })
}
