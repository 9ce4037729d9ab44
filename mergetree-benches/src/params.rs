//! Benchmark parameter types.

use std::fmt;

use mergetree_core::SweepStrategy;

use crate::source::FieldPattern;

/// Parameters for a grid benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GridBenchParams {
    /// Extent of the cubic grid along each axis.
    pub side: usize,
    /// Shape of the synthetic field.
    pub pattern: FieldPattern,
}

impl fmt::Display for GridBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "side={},{}", self.side, self.pattern)
    }
}

/// Parameters for a full build benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct BuildBenchParams {
    /// Grid parameters.
    pub grid: GridBenchParams,
    /// Sweep scheduling.
    pub strategy: SweepStrategy,
}

impl fmt::Display for BuildBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategy = match self.strategy {
            SweepStrategy::Sequential => "sequential",
            SweepStrategy::Concurrent => "concurrent",
        };
        write!(f, "{},{strategy}", self.grid)
    }
}
