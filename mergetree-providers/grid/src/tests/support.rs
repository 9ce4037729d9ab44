use arrow_array::{ArrayRef, Float32Array, Int32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

pub(crate) fn write_parquet(column: &str, values: Vec<Option<f32>>) -> Bytes {
    let field = Field::new(column, DataType::Float32, true);
    write_batches(field, vec![Arc::new(Float32Array::from(values)) as ArrayRef], None)
}

pub(crate) fn write_parquet_in_batches(column: &str, values: &[f32], batch_rows: usize) -> Bytes {
    let field = Field::new(column, DataType::Float32, false);
    let arrays = values
        .chunks(batch_rows)
        .map(|chunk| Arc::new(Float32Array::from(chunk.to_vec())) as ArrayRef)
        .collect();
    let properties = WriterProperties::builder()
        .set_max_row_group_size(batch_rows)
        .build();
    write_batches(field, arrays, Some(properties))
}

pub(crate) fn write_int_parquet(column: &str, values: Vec<i32>) -> Bytes {
    let field = Field::new(column, DataType::Int32, false);
    write_batches(field, vec![Arc::new(Int32Array::from(values)) as ArrayRef], None)
}

fn write_batches(
    field: Field,
    arrays: Vec<ArrayRef>,
    properties: Option<WriterProperties>,
) -> Bytes {
    let schema = Arc::new(Schema::new(vec![field]));
    let mut buffer = Vec::new();
    {
        let mut writer =
            ArrowWriter::try_new(&mut buffer, schema.clone(), properties).expect("writer");
        for array in arrays {
            let batch = RecordBatch::try_new(schema.clone(), vec![array]).expect("batch");
            writer.write(&batch).expect("write");
        }
        writer.close().expect("close");
    }
    Bytes::from(buffer)
}
