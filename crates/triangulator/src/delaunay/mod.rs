//! Delaunay triangulation by incremental (Bowyer-Watson) insertion.
//!
//! Purpose
//! - Turn a validated `PointSet` into a `TriangleMesh` covering its convex
//!   hull, with no input point strictly inside any triangle's circumcircle.
//!
//! Algorithm
//! - Merge near-duplicates (`geom::distinct_points`), then seed with the first
//!   non-collinear triple of survivors and close the hull with ghost
//!   triangles sharing a vertex at infinity. The same `geom::seed_triangle`
//!   decides whether the set is collinear, so the early-out and the seed
//!   always agree. Ghosts are the
//!   enclosing structure; a ghost `(a, b, ∞)` conflicts with points left of
//!   `a → b`.
//! - Insert the remaining survivors in index order. For each point: locate it
//!   by a visibility walk, flood the conflict region (triangles whose
//!   circumcircle strictly contains it), take the cavity boundary from a
//!   per-insertion edge-count map, remove the region and fan the boundary to
//!   the new point. Walk and conflict tests use exact signs, so the region
//!   is always a disk; a region that is not aborts the run.
//! - Drop ghosts and zero-area triangles; orient survivors counter-clockwise.
//!
//! Determinism
//! - No step iterates a hash map, so identical input yields identical output,
//!   triangle order included. Cocircular ties resolve by insertion order; use
//!   `TriangleMesh::canonicalized` for order-independent comparison.

mod bowyer_watson;
mod mesh;
mod validate;

pub use validate::{
    covers_convex_hull, delaunay_violations, is_delaunay, mesh_area, repeated_edges,
    DelaunayViolation,
};

use crate::error::Result;
use crate::geom::{distinct_points, exact_orientation, seed_triangle, GeomCfg, Orientation};
use crate::types::{PointSet, Triangle, TriangleMesh};

use bowyer_watson::{insert_point, Inserted};
use mesh::{is_ghost, WorkMesh};

/// Counters collected during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriangulationStats {
    /// Points that became vertices (seed triple included).
    pub inserted: usize,
    /// Points skipped because they coincide with an earlier point.
    pub duplicates: usize,
    /// Ghost (hull-closing) triangles dropped at the end.
    pub ghosts_removed: usize,
    /// Zero-area triangles dropped at the end.
    pub degenerate_removed: usize,
    /// Insertions whose walk failed and fell back to a linear scan.
    pub locate_fallbacks: usize,
    /// Largest number of triangles removed by a single insertion.
    pub largest_cavity: usize,
    /// Triangles (ghosts included) created by all insertions.
    pub created: usize,
}

/// Bowyer-Watson triangulator with explicit tolerances.
#[derive(Clone, Copy, Debug, Default)]
pub struct Triangulator {
    pub cfg: GeomCfg,
}

impl Triangulator {
    #[inline]
    pub fn new(cfg: GeomCfg) -> Self {
        Self { cfg }
    }

    pub fn triangulate(&self, points: &PointSet) -> Result<TriangleMesh> {
        self.triangulate_with_stats(points).map(|(mesh, _)| mesh)
    }

    #[tracing::instrument(skip_all, fields(points = points.len()))]
    pub fn triangulate_with_stats(
        &self,
        points: &PointSet,
    ) -> Result<(TriangleMesh, TriangulationStats)> {
        let cfg = self.cfg;
        let pts = points.points.as_slice();
        let mut stats = TriangulationStats::default();
        let distinct = distinct_points(pts, cfg);
        stats.duplicates = pts.len() - distinct.len();
        let Some(seed) = seed_triangle(pts, &distinct, cfg) else {
            tracing::debug!(distinct = distinct.len(), "fewer than three non-collinear points");
            return Ok((TriangleMesh::default(), stats));
        };

        let mut work = WorkMesh::seed(pts, seed);
        stats.inserted = 3;
        for &pi in distinct.iter().filter(|&&i| !seed.contains(&i)) {
            match insert_point(&mut work, pi, &mut stats)? {
                Inserted::Cavity { removed, created } => {
                    stats.inserted += 1;
                    stats.created += created;
                    stats.largest_cavity = stats.largest_cavity.max(removed);
                }
                Inserted::Duplicate => {
                    tracing::trace!(point = pi, "skipping duplicate point");
                    stats.duplicates += 1;
                }
            }
        }

        let mut triangles = Vec::with_capacity(work.len());
        for t in work.iter() {
            if is_ghost(&t) {
                stats.ghosts_removed += 1;
                continue;
            }
            let tri = match exact_orientation(pts[t[0]], pts[t[1]], pts[t[2]]) {
                Orientation::CounterClockwise => Triangle::new(t[0], t[1], t[2]),
                Orientation::Clockwise => Triangle::new(t[0], t[2], t[1]),
                Orientation::Collinear => {
                    stats.degenerate_removed += 1;
                    continue;
                }
            };
            triangles.push(tri);
        }
        tracing::debug!(
            triangles = triangles.len(),
            inserted = stats.inserted,
            duplicates = stats.duplicates,
            degenerate = stats.degenerate_removed,
            fallbacks = stats.locate_fallbacks,
            "triangulated"
        );
        Ok((TriangleMesh::new(triangles), stats))
    }
}

/// Triangulate with default tolerances.
pub fn triangulate(points: &PointSet) -> Result<TriangleMesh> {
    Triangulator::default().triangulate(points)
}

#[cfg(test)]
mod tests;
