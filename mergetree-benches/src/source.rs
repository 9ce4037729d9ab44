//! Synthetic grid fields for benchmarking.

use std::fmt;

use mergetree_providers_grid::RegularGrid;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::error::BenchSetupError;

/// Shape of a synthetic scalar field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldPattern {
    /// Independent uniform samples in `[0, 1)`. Roughly one vertex in seven
    /// is a local maximum, which stresses the merge queue.
    Uniform,
    /// A smooth sum of sines with a little noise to break ties. Few critical
    /// points, so most vertices are regular.
    Ripples,
}

impl fmt::Display for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uniform => "uniform",
            Self::Ripples => "ripples",
        })
    }
}

/// Configuration of a cubic synthetic grid.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticGridConfig {
    /// Extent along each axis.
    pub side: usize,
    /// Field shape.
    pub pattern: FieldPattern,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Angular frequency of the ripple pattern, in radians per grid step.
const RIPPLE_FREQUENCY: f32 = 0.4;

/// Amplitude of the tie-breaking noise added to ripples.
const RIPPLE_NOISE: f32 = 1.0e-3;

/// Generates a `side³` grid following `config`.
///
/// # Errors
/// Returns [`BenchSetupError::Grid`] when `side` is zero or the point count
/// overflows.
pub fn generate_grid(config: &SyntheticGridConfig) -> Result<RegularGrid, BenchSetupError> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let name = format!("synthetic-{}", config.pattern);
    let dims = [config.side; 3];
    let grid = match config.pattern {
        FieldPattern::Uniform => {
            RegularGrid::from_fn(name, dims, |_| rng.gen_range(0.0_f32..1.0_f32))?
        }
        FieldPattern::Ripples => RegularGrid::from_fn(name, dims, |coords| {
            ripple(coords) + rng.gen_range(0.0_f32..RIPPLE_NOISE)
        })?,
    };
    Ok(grid)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "grid coordinates are small enough to be exact in f32"
)]
#[expect(clippy::float_arithmetic, reason = "ripples are a sum of sines")]
fn ripple(coords: [usize; 3]) -> f32 {
    coords
        .iter()
        .map(|&c| (c as f32 * RIPPLE_FREQUENCY).sin())
        .sum()
}
