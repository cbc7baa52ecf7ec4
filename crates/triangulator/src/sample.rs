//! Seeded random point sets for tests, benches and the CLI `generate` command.
//!
//! Model
//! - `Uniform`: i.i.d. points in the square `[-half_extent, half_extent]²`.
//! - `Lattice { cells }`: integer coordinates in `0..=cells` on both axes,
//!   scaled by `half_extent / cells`. Small `cells` produce many duplicates,
//!   collinear runs and cocircular quadruples, which is what the
//!   degenerate-input tests want.
//! - A draw is a pure function of `(cfg, seed)`.

use nalgebra::vector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PointSet;

/// Coordinate distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    Uniform,
    Lattice { cells: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCfg {
    pub count: usize,
    pub half_extent: f64,
    pub layout: Layout,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            count: 100,
            half_extent: 1.0,
            layout: Layout::Uniform,
        }
    }
}

impl SampleCfg {
    #[inline]
    pub fn uniform(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    #[inline]
    pub fn lattice(count: usize, cells: u32) -> Self {
        Self {
            count,
            layout: Layout::Lattice { cells },
            ..Self::default()
        }
    }
}

/// Draw `cfg.count` points with a `StdRng` seeded from `seed`.
pub fn draw_points(cfg: SampleCfg, seed: u64) -> PointSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let h = cfg.half_extent.abs();
    let points = (0..cfg.count)
        .map(|_| match cfg.layout {
            Layout::Uniform if h > 0.0 => vector![rng.gen_range(-h..=h), rng.gen_range(-h..=h)],
            Layout::Uniform => vector![0.0, 0.0],
            Layout::Lattice { cells } => {
                let cells = cells.max(1);
                let step = h / f64::from(cells);
                let i = rng.gen_range(0..=cells);
                let j = rng.gen_range(0..=cells);
                vector![f64::from(i) * step, f64::from(j) * step]
            }
        })
        .collect();
    PointSet::new(points)
}
