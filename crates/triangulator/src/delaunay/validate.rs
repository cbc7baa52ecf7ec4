//! Post-hoc checks on a finished mesh (brute force; tests and diagnostics).
//!
//! Points merged away by `geom::distinct_points` are not required to be
//! outside circumcircles; every surviving point is. Triangles with an index
//! outside the point set never pass a check.

use std::collections::HashMap;

use crate::geom::{
    convex_hull, distinct_points, in_circumcircle, polygon_area, seed_triangle, signed_area2,
    GeomCfg,
};
use crate::types::{Point, PointSet, Triangle, TriangleMesh};

/// Input point strictly inside the circumcircle of a mesh triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelaunayViolation {
    pub triangle: usize,
    pub point: usize,
}

fn corners(points: &PointSet, t: &Triangle) -> Option<[Point; 3]> {
    let [a, b, c] = t.indices();
    Some([*points.get(a)?, *points.get(b)?, *points.get(c)?])
}

/// All (triangle, point) pairs breaking the empty-circumcircle property.
/// A triangle with an out-of-range index is reported once against its
/// first bad index. `O(triangles × points)`.
pub fn delaunay_violations(
    points: &PointSet,
    mesh: &TriangleMesh,
    cfg: GeomCfg,
) -> Vec<DelaunayViolation> {
    let distinct = distinct_points(&points.points, cfg);
    let mut out = Vec::new();
    for (ti, t) in mesh.iter().enumerate() {
        let Some(tri) = corners(points, t) else {
            let point = t.indices().into_iter().find(|&i| i >= points.len());
            out.extend(point.map(|point| DelaunayViolation {
                triangle: ti,
                point,
            }));
            continue;
        };
        for &pi in &distinct {
            if !t.contains(pi) && in_circumcircle(points[pi], tri, cfg) {
                out.push(DelaunayViolation {
                    triangle: ti,
                    point: pi,
                });
            }
        }
    }
    out
}

pub fn is_delaunay(points: &PointSet, mesh: &TriangleMesh, cfg: GeomCfg) -> bool {
    let distinct = distinct_points(&points.points, cfg);
    mesh.iter().all(|t| {
        corners(points, t).is_some_and(|tri| {
            distinct
                .iter()
                .all(|&pi| t.contains(pi) || !in_circumcircle(points[pi], tri, cfg))
        })
    })
}

/// Directed edges used by more than one triangle, in first-seen order.
/// Empty for a consistently oriented, non-overlapping mesh.
pub fn repeated_edges(mesh: &TriangleMesh) -> Vec<(usize, usize)> {
    let mut seen: HashMap<(usize, usize), u32> = HashMap::with_capacity(3 * mesh.len());
    let mut out = Vec::new();
    for t in mesh {
        let [a, b, c] = t.indices();
        for e in [(a, b), (b, c), (c, a)] {
            let n = seen.entry(e).or_insert(0);
            *n += 1;
            if *n == 2 {
                out.push(e);
            }
        }
    }
    out
}

/// Sum of the (unsigned) triangle areas; triangles with out-of-range
/// indices contribute nothing.
pub fn mesh_area(points: &PointSet, mesh: &TriangleMesh) -> f64 {
    mesh.iter()
        .filter_map(|t| corners(points, t))
        .map(|[a, b, c]| 0.5 * signed_area2(a, b, c).abs())
        .sum()
}

/// Mesh area matches the area of the convex hull of the surviving points
/// (relative tolerance `cfg.eps` per triangle); a set that is collinear
/// under `cfg` must have an empty mesh. Area-based: detects missing hull
/// pockets, not overlaps (see `repeated_edges`).
pub fn covers_convex_hull(points: &PointSet, mesh: &TriangleMesh, cfg: GeomCfg) -> bool {
    if mesh.max_index().is_some_and(|m| m >= points.len()) {
        return false;
    }
    let distinct = distinct_points(&points.points, cfg);
    if seed_triangle(&points.points, &distinct, cfg).is_none() {
        return mesh.is_empty();
    }
    let survivors: Vec<Point> = distinct.iter().map(|&i| points[i]).collect();
    let hull = convex_hull(&survivors);
    let hull_area = polygon_area(&survivors, &hull).abs();
    let tol = cfg.eps * (mesh.len() as f64 + 1.0) * hull_area;
    (mesh_area(points, mesh) - hull_area).abs() <= tol
}
