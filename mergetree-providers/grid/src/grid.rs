//! Regular grid provider and Parquet ingestion.
use std::{fs::File, path::Path};

use arrow_array::{Float32Array, RecordBatchReader};

use mergetree_core::{FieldError, NeighborRelation, ScalarField};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;

use crate::errors::GridProviderError;
use crate::ingest::{append_float32_values, validate_float32_field};

/// Scalar samples on a regular 3D lattice.
///
/// Vertex ids are laid out with x varying fastest, then y, then z, so the
/// point `[x, y, z]` has id `x + nx * (y + ny * z)`. Two vertices are
/// neighbors when they differ by one step along exactly one axis.
///
/// # Examples
/// ```
/// use mergetree_core::{NeighborRelation, ScalarField};
/// use mergetree_providers_grid::RegularGrid;
///
/// let grid = RegularGrid::try_new("slab", [2, 2, 1], vec![0.0, 1.0, 2.0, 3.0])?;
/// assert_eq!(grid.len(), 4);
/// assert_eq!(grid.index([1, 1, 0]), Some(3));
///
/// let mut out = Vec::new();
/// grid.neighbors(0, &mut out)?;
/// assert_eq!(out, [1, 2]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegularGrid {
    name: String,
    dims: [usize; 3],
    values: Vec<f32>,
}

impl RegularGrid {
    /// Creates a grid from values in x-fastest order.
    ///
    /// # Errors
    /// Returns [`GridProviderError::ZeroDimension`] when any extent is zero,
    /// [`GridProviderError::CapacityOverflow`] when the point count does not
    /// fit in `usize`, and [`GridProviderError::ShapeMismatch`] when
    /// `values.len()` differs from the point count.
    pub fn try_new(
        name: impl Into<String>,
        dims: [usize; 3],
        values: Vec<f32>,
    ) -> Result<Self, GridProviderError> {
        let expected = point_count(dims)?;
        if values.len() != expected {
            return Err(GridProviderError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            dims,
            values,
        })
    }

    /// Creates a grid by evaluating `f` at every point.
    ///
    /// # Errors
    /// See [`RegularGrid::try_new`].
    pub fn from_fn(
        name: impl Into<String>,
        dims: [usize; 3],
        mut f: impl FnMut([usize; 3]) -> f32,
    ) -> Result<Self, GridProviderError> {
        let count = point_count(dims)?;
        let [nx, ny, nz] = dims;
        let mut values = Vec::with_capacity(count);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    values.push(f([x, y, z]));
                }
            }
        }
        Self::try_new(name, dims, values)
    }

    /// Grid extents along x, y and z.
    #[must_use]
    #[rustfmt::skip]
    pub fn dims(&self) -> [usize; 3] { self.dims }

    /// Samples in x-fastest order.
    #[must_use]
    #[rustfmt::skip]
    pub fn values(&self) -> &[f32] { &self.values }

    /// Vertex id of the point at `coords`, or `None` outside the grid.
    #[must_use]
    pub fn index(&self, coords: [usize; 3]) -> Option<usize> {
        let [nx, ny, nz] = self.dims;
        let [x, y, z] = coords;
        (x < nx && y < ny && z < nz).then(|| x + nx * (y + ny * z))
    }

    /// Coordinates of `vertex`, or `None` when it is not a grid point.
    #[must_use]
    pub fn coords(&self, vertex: usize) -> Option<[usize; 3]> {
        if vertex >= self.values.len() {
            return None;
        }
        let [nx, ny, _] = self.dims;
        let (x, rest) = (vertex % nx, vertex / nx);
        Some([x, rest % ny, rest / ny])
    }

    /// Loads samples from an Arrow [`Float32Array`].
    ///
    /// # Errors
    /// Returns [`GridProviderError::NullValue`] for null entries, plus the
    /// shape errors of [`RegularGrid::try_new`].
    pub fn try_from_float32_array(
        name: impl Into<String>,
        dims: [usize; 3],
        array: &Float32Array,
    ) -> Result<Self, GridProviderError> {
        let mut values = Vec::new();
        append_float32_values(array, "values", 0, &mut values)?;
        Self::try_new(name, dims, values)
    }

    /// Loads samples from a Parquet `Float32` column stored at `path`.
    ///
    /// # Errors
    /// See [`RegularGrid::try_from_parquet_reader`]; also fails with
    /// [`GridProviderError::Io`] when the file cannot be opened.
    pub fn try_from_parquet_path(
        name: impl Into<String>,
        path: impl AsRef<Path>,
        column: &str,
        dims: [usize; 3],
    ) -> Result<Self, GridProviderError> {
        let file = File::open(path)?;
        Self::try_from_parquet_reader(name, file, column, dims)
    }

    /// Loads samples from a Parquet reader, one row per grid point.
    ///
    /// # Errors
    /// Returns [`GridProviderError::ColumnNotFound`] or
    /// [`GridProviderError::InvalidColumnType`] for a missing or non-`Float32`
    /// column, [`GridProviderError::NullValue`] for null rows, decoding
    /// failures from Arrow or Parquet, and the shape errors of
    /// [`RegularGrid::try_new`].
    pub fn try_from_parquet_reader<R>(
        name: impl Into<String>,
        reader: R,
        column: &str,
        dims: [usize; 3],
    ) -> Result<Self, GridProviderError>
    where
        R: ChunkReader + Send + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
        let reader = builder.with_projection(mask).build()?;
        let schema = reader.schema();
        let column_index =
            schema
                .index_of(column)
                .map_err(|_| GridProviderError::ColumnNotFound {
                    column: column.to_owned(),
                })?;
        validate_float32_field(schema.field(column_index), column)?;

        let mut values = Vec::new();
        for batch in reader {
            let batch = batch?;
            let rows = values.len();
            append_float32_values(batch.column(column_index), column, rows, &mut values)?;
        }
        Self::try_new(name, dims, values)
    }
}

fn point_count(dims: [usize; 3]) -> Result<usize, GridProviderError> {
    if dims.contains(&0) {
        return Err(GridProviderError::ZeroDimension { dims });
    }
    let [nx, ny, nz] = dims;
    nx.checked_mul(ny)
        .and_then(|plane| plane.checked_mul(nz))
        .ok_or(GridProviderError::CapacityOverflow { dims })
}

impl ScalarField for RegularGrid {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn scalar(&self, vertex: usize) -> Result<f32, FieldError> {
        self.values
            .get(vertex)
            .copied()
            .ok_or(FieldError::OutOfBounds {
                vertex,
                len: self.values.len(),
            })
    }
}

impl NeighborRelation for RegularGrid {
    fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError> {
        let coords = self.coords(vertex).ok_or(FieldError::OutOfBounds {
            vertex,
            len: self.values.len(),
        })?;
        for axis in 0..3 {
            let mut lower = coords;
            if let Some(value) = coords[axis].checked_sub(1) {
                lower[axis] = value;
                out.extend(self.index(lower));
            }
            let mut upper = coords;
            upper[axis] += 1;
            out.extend(self.index(upper));
        }
        Ok(())
    }
}
