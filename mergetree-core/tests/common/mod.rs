//! Shared fixtures for the core integration tests.

use mergetree_core::{FieldError, NeighborRelation, ScalarField};

/// Dense scalar values on an `nx * ny * nz` grid with 6-connectivity.
#[derive(Clone, Debug)]
pub struct Grid {
    dims: [usize; 3],
    values: Vec<f32>,
}

impl Grid {
    pub fn from_fn(dims: [usize; 3], value: impl Fn([usize; 3]) -> f32) -> Self {
        let [nx, ny, nz] = dims;
        let mut values = Vec::with_capacity(nx * ny * nz);
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    values.push(value([x, y, z]));
                }
            }
        }
        Self { dims, values }
    }

    /// A single peak at the centre: the value is minus the Euclidean distance
    /// to the centre vertex.
    pub fn cone(side: usize) -> Self {
        let centre = (side / 2) as f32;
        Self::from_fn([side; 3], |[x, y, z]| {
            let (dx, dy, dz) = (x as f32 - centre, y as f32 - centre, z as f32 - centre);
            -(dx * dx + dy * dy + dz * dz).sqrt()
        })
    }

    pub fn index(&self, [x, y, z]: [usize; 3]) -> usize {
        let [nx, ny, _] = self.dims;
        x + nx * (y + ny * z)
    }

    fn coords(&self, vertex: usize) -> [usize; 3] {
        let [nx, ny, _] = self.dims;
        [vertex % nx, (vertex / nx) % ny, vertex / (nx * ny)]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

impl ScalarField for Grid {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn name(&self) -> &str {
        "grid"
    }

    fn scalar(&self, vertex: usize) -> Result<f32, FieldError> {
        self.values.get(vertex).copied().ok_or(FieldError::OutOfBounds {
            vertex,
            len: self.values.len(),
        })
    }
}

impl NeighborRelation for Grid {
    fn neighbors(&self, vertex: usize, out: &mut Vec<usize>) -> Result<(), FieldError> {
        if vertex >= self.values.len() {
            return Err(FieldError::OutOfBounds {
                vertex,
                len: self.values.len(),
            });
        }
        let coords = self.coords(vertex);
        for axis in 0..3 {
            if coords[axis] > 0 {
                let mut lower = coords;
                lower[axis] -= 1;
                out.push(self.index(lower));
            }
            if coords[axis] + 1 < self.dims[axis] {
                let mut upper = coords;
                upper[axis] += 1;
                out.push(self.index(upper));
            }
        }
        Ok(())
    }
}
