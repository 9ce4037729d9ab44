use arrow_schema::{ArrowError, DataType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridProviderError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: String },
    #[error("column `{column}` must be Float32 but found {actual:?}")]
    InvalidColumnType { column: String, actual: DataType },
    #[error("row {row} is null")]
    NullValue { row: usize },
    #[error("grid dimensions {dims:?} must all be non-zero")]
    ZeroDimension { dims: [usize; 3] },
    #[error("grid dimensions {dims:?} exceed capacity limits")]
    CapacityOverflow { dims: [usize; 3] },
    #[error("grid dimensions imply {expected} values but {actual} were supplied")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
