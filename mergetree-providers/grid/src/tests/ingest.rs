use crate::ingest::{append_float32_values, validate_float32_field};
use arrow_array::{Float32Array, Int32Array};
use arrow_schema::{DataType, Field};
use rstest::rstest;

use super::GridProviderError;

#[rstest]
#[case::float32(DataType::Float32, true)]
#[case::float64(DataType::Float64, false)]
#[case::int32(DataType::Int32, false)]
fn validates_float32_fields(#[case] data_type: DataType, #[case] accepted: bool) {
    let field = Field::new("values", data_type, false);
    assert_eq!(validate_float32_field(&field, "values").is_ok(), accepted);
}

#[rstest]
fn appends_dense_values() {
    let array = Float32Array::from(vec![1.0, 2.5, -3.0]);
    let mut out = vec![9.0];
    append_float32_values(&array, "values", 1, &mut out).expect("dense column");
    assert_eq!(out, [9.0, 1.0, 2.5, -3.0]);
}

#[rstest]
fn reports_null_rows_with_their_global_offset() {
    let array = Float32Array::from(vec![Some(1.0), None, Some(2.0)]);
    let mut out = Vec::new();
    let err = append_float32_values(&array, "values", 10, &mut out)
        .expect_err("null entries must be rejected");
    assert!(matches!(err, GridProviderError::NullValue { row: 11 }));
}

#[rstest]
fn rejects_arrays_of_another_type() {
    let array = Int32Array::from(vec![1, 2]);
    let mut out = Vec::new();
    let err = append_float32_values(&array, "values", 0, &mut out)
        .expect_err("integers are not scalars");
    assert!(matches!(
        err,
        GridProviderError::InvalidColumnType { ref column, actual: DataType::Int32 } if column == "values"
    ));
}
