//! Helpers for copying Arrow `Float32` columns into dense buffers.
use arrow_array::{Array, Float32Array};
use arrow_schema::{DataType, Field};

use crate::errors::GridProviderError;

pub(crate) fn validate_float32_field(field: &Field, column: &str) -> Result<(), GridProviderError> {
    match field.data_type() {
        DataType::Float32 => Ok(()),
        other => Err(GridProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

pub(crate) fn append_float32_values(
    array: &dyn Array,
    column: &str,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), GridProviderError> {
    let floats = array
        .as_any()
        .downcast_ref::<Float32Array>()
        .ok_or_else(|| GridProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })?;
    if floats.null_count() == 0 {
        out.extend_from_slice(floats.values().as_ref());
        return Ok(());
    }
    out.reserve(floats.len());
    for (row, value) in floats.iter().enumerate() {
        let value = value.ok_or(GridProviderError::NullValue {
            row: start_row + row,
        })?;
        out.push(value);
    }
    Ok(())
}
