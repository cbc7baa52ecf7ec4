//! JSON summaries printed by `inspect`.

use serde::Serialize;
use triangulator::delaunay::{covers_convex_hull, delaunay_violations, mesh_area, repeated_edges};
use triangulator::geom::{all_collinear, convex_hull, distinct_points, is_degenerate, polygon_area};
use triangulator::{GeomCfg, PointSet, TriangleMesh};

#[derive(Debug, Serialize, PartialEq)]
pub struct Bounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PointSetSummary {
    pub points: usize,
    /// Points left after merging near-duplicates.
    pub distinct: usize,
    pub bounds: Option<Bounds>,
    pub collinear: bool,
    pub hull_vertices: usize,
    pub hull_area: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MeshSummary {
    #[serde(flatten)]
    pub point_set: PointSetSummary,
    pub triangles: usize,
    pub area: f64,
    pub covers_hull: bool,
    /// Directed edges shared by two triangles (overlap).
    pub repeated_edges: usize,
    /// Triangles that are degenerate under the tolerance.
    pub slivers: usize,
    pub delaunay: bool,
    /// First few `(triangle, point)` pairs breaking the empty-circle property.
    pub violations: Vec<(usize, usize)>,
}

const MAX_LISTED_VIOLATIONS: usize = 8;

fn bounds(points: &PointSet) -> Option<Bounds> {
    let first = points.get(0)?;
    let (mut min, mut max) = ([first.x, first.y], [first.x, first.y]);
    for p in points.iter() {
        min = [min[0].min(p.x), min[1].min(p.y)];
        max = [max[0].max(p.x), max[1].max(p.y)];
    }
    Some(Bounds { min, max })
}

pub fn summarize_points(points: &PointSet, cfg: GeomCfg) -> PointSetSummary {
    let hull = convex_hull(&points.points);
    PointSetSummary {
        points: points.len(),
        distinct: distinct_points(&points.points, cfg).len(),
        bounds: bounds(points),
        collinear: all_collinear(&points.points, cfg),
        hull_vertices: hull.len(),
        hull_area: polygon_area(&points.points, &hull).abs(),
    }
}

pub fn summarize_mesh(points: &PointSet, mesh: &TriangleMesh, cfg: GeomCfg) -> MeshSummary {
    let violations = delaunay_violations(points, mesh, cfg);
    let slivers = mesh
        .iter()
        .filter(|t| {
            let [a, b, c] = t.indices();
            match (points.get(a), points.get(b), points.get(c)) {
                (Some(&a), Some(&b), Some(&c)) => is_degenerate([a, b, c], cfg),
                _ => true,
            }
        })
        .count();
    MeshSummary {
        point_set: summarize_points(points, cfg),
        triangles: mesh.len(),
        area: mesh_area(points, mesh),
        covers_hull: covers_convex_hull(points, mesh, cfg),
        repeated_edges: repeated_edges(mesh).len(),
        slivers,
        delaunay: violations.is_empty(),
        violations: violations
            .iter()
            .take(MAX_LISTED_VIOLATIONS)
            .map(|v| (v.triangle, v.point))
            .collect(),
    }
}
