//! Geometry kernel: orientation, circumcircle containment, degeneracy.
//!
//! Purpose
//! - Hold every floating-point decision used by the engine, so the insertion
//!   loop, the hull and the validators classify configurations identically.
//!
//! Exact signs
//! - `orient2d` and `incircle` return values whose sign is exact (adaptive
//!   precision via the `robust` crate). The engine makes every topological
//!   decision (walk direction, conflict test, hull turn) from these signs, so
//!   conflict regions are always star-shaped around the inserted point.
//!
//! Tolerance model
//! - `GeomCfg::eps` is relative and only decides which inputs are treated
//!   as the same point or as a line:
//!   - two points are merged when closer than `eps` times the diagonal of
//!     the set's bounding box (`GeomCfg::snap_distance`), which is invariant
//!     under translation and uniform scaling;
//!   - `orientation` reports `Collinear` when the cross product is within
//!     `eps · |b−a| · |c−a|` (a bound on the sine of the corner angle);
//!   - `in_circumcircle` requires the determinant to exceed `eps` times the
//!     sum of the absolute values of its terms.
//! - `eps = 0` makes every predicate exact.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector2;
use robust::Coord;

use crate::types::Point;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Relative collinearity / coincidence / in-circle threshold.
    pub eps: f64,
}

/// Default relative tolerance.
pub const DEFAULT_EPS: f64 = 1e-9;

impl Default for GeomCfg {
    fn default() -> Self {
        Self { eps: DEFAULT_EPS }
    }
}

impl GeomCfg {
    /// All predicates exact; only identical coordinates are merged.
    pub const EXACT: Self = Self { eps: 0.0 };

    #[inline]
    pub fn with_eps(eps: f64) -> Self {
        Self { eps }
    }

    /// Distance below which two points of `points` count as the same point.
    pub fn snap_distance(&self, points: &[Point]) -> f64 {
        self.eps * bbox_diagonal(points)
    }
}

/// Turn direction of an ordered triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

#[inline]
fn cross(u: Vector2<f64>, v: Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

#[inline]
fn coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Twice the signed area of `abc` (positive for counter-clockwise), in plain
/// floating point.
#[inline]
pub fn signed_area2(a: Point, b: Point, c: Point) -> f64 {
    cross(b - a, c - a)
}

/// `(b−a) × (c−a)` with an exact sign: positive for counter-clockwise,
/// zero only for exactly collinear input.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> f64 {
    robust::orient2d(coord(a), coord(b), coord(c))
}

/// In-circle determinant with an exact sign: positive when `p` lies strictly
/// inside the circle through the counter-clockwise triple `a, b, c`.
#[inline]
pub fn incircle(a: Point, b: Point, c: Point, p: Point) -> f64 {
    robust::incircle(coord(a), coord(b), coord(c), coord(p))
}

/// Exact orientation of `(a, b, c)`.
#[inline]
pub fn exact_orientation(a: Point, b: Point, c: Point) -> Orientation {
    let det = orient2d(a, b, c);
    if det > 0.0 {
        Orientation::CounterClockwise
    } else if det < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Orientation of `(a, b, c)`; near-collinear triples within the relative
/// band count as `Collinear`.
pub fn orientation(a: Point, b: Point, c: Point, cfg: GeomCfg) -> Orientation {
    let det = orient2d(a, b, c);
    let band = cfg.eps * (b - a).norm() * (c - a).norm();
    if det > band {
        Orientation::CounterClockwise
    } else if det < -band {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Diagonal of the axis-aligned bounding box (0 for an empty set).
pub fn bbox_diagonal(points: &[Point]) -> f64 {
    let Some((first, rest)) = points.split_first() else {
        return 0.0;
    };
    let (lo, hi) = rest.iter().fold((*first, *first), |(lo, hi), p| {
        (lo.inf(p), hi.sup(p))
    });
    (hi - lo).norm()
}

/// `a` and `b` are at most `tol` apart.
#[inline]
pub fn coincident(a: Point, b: Point, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Zero or near-zero area: collinear, or the shortest edge is negligible
/// next to the longest.
pub fn is_degenerate(tri: [Point; 3], cfg: GeomCfg) -> bool {
    let [a, b, c] = tri;
    let lens = [(b - a).norm(), (c - b).norm(), (a - c).norm()];
    let longest = lens.iter().copied().fold(0.0, f64::max);
    let shortest = lens.iter().copied().fold(f64::INFINITY, f64::min);
    shortest <= cfg.eps * longest || orientation(a, b, c, cfg) == Orientation::Collinear
}

/// `p` lies strictly inside the circumcircle of `tri`.
///
/// The triangle is taken in counter-clockwise order. Exactly collinear
/// triangles have no circumcircle and never contain anything. The
/// determinant must clear `eps` times the magnitude of its terms
/// (evaluated relative to `p`).
pub fn in_circumcircle(p: Point, tri: [Point; 3], cfg: GeomCfg) -> bool {
    let [a, mut b, mut c] = tri;
    match exact_orientation(a, b, c) {
        Orientation::Collinear => return false,
        Orientation::Clockwise => std::mem::swap(&mut b, &mut c),
        Orientation::CounterClockwise => {}
    }
    let det = incircle(a, b, c, p);
    if cfg.eps == 0.0 {
        return det > 0.0;
    }
    let (ra, rb, rc) = (a - p, b - p, c - p);
    let magnitude = ra.norm_squared() * cross(rb, rc).abs()
        + rb.norm_squared() * cross(ra, rc).abs()
        + rc.norm_squared() * cross(ra, rb).abs();
    det > cfg.eps * magnitude
}

/// Containment test for a triangle `(a, b, ∞)` whose third vertex is at
/// infinity: the circumcircle degenerates to the open half-plane left of
/// `a → b`, plus the open segment `ab` itself. Exact.
pub fn in_open_halfplane(a: Point, b: Point, p: Point) -> bool {
    match exact_orientation(a, b, p) {
        Orientation::CounterClockwise => true,
        Orientation::Clockwise => false,
        Orientation::Collinear => (p - a).dot(&(b - a)) > 0.0 && (p - b).dot(&(a - b)) > 0.0,
    }
}

/// Indices of the points that survive merging, in index order: a point is
/// dropped when it lies within `cfg.snap_distance(points)` of an earlier
/// surviving point. Survivors are pairwise farther apart than that.
pub fn distinct_points(points: &[Point], cfg: GeomCfg) -> Vec<usize> {
    let tol = cfg.snap_distance(points);
    let mut kept = Vec::with_capacity(points.len());
    if tol.is_nan() || tol <= 0.0 {
        // `+ 0.0` folds -0.0 into 0.0
        let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())) {
                kept.push(i);
            }
        }
        return kept;
    }
    let lo = points
        .iter()
        .fold(Point::repeat(f64::INFINITY), |lo, p| lo.inf(p));
    // saturating casts keep far-away cells valid keys; neighbours are still
    // checked by distance
    let cell = |p: Point| {
        (
            ((p.x - lo.x) / tol).floor() as i64,
            ((p.y - lo.y) / tol).floor() as i64,
        )
    };
    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, &p) in points.iter().enumerate() {
        let (cx, cy) = cell(p);
        let near = (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (cx.saturating_add(dx), cy.saturating_add(dy))))
            .filter_map(|key| grid.get(&key))
            .flatten()
            .any(|&j| coincident(points[j], p, tol));
        if !near {
            grid.entry((cx, cy)).or_default().push(i);
            kept.push(i);
        }
    }
    kept
}

/// First non-collinear triple among `distinct` (the first two survivors and
/// the earliest later survivor off their line), in counter-clockwise order.
/// `None` when every survivor lies within the collinearity band.
pub fn seed_triangle(points: &[Point], distinct: &[usize], cfg: GeomCfg) -> Option<[usize; 3]> {
    let (&a, rest) = distinct.split_first()?;
    let (&b, rest) = rest.split_first()?;
    rest.iter()
        .find_map(|&c| match orientation(points[a], points[b], points[c], cfg) {
            Orientation::CounterClockwise => Some([a, b, c]),
            Orientation::Clockwise => Some([a, c, b]),
            Orientation::Collinear => None,
        })
}

/// Every point lies on one line once near-duplicates are merged (also true
/// for fewer than three points). Agrees with the engine: a set is collinear
/// exactly when it triangulates to nothing.
pub fn all_collinear(points: &[Point], cfg: GeomCfg) -> bool {
    seed_triangle(points, &distinct_points(points, cfg), cfg).is_none()
}

/// Andrew's monotone chain convex hull with exact turn tests; returns point
/// indices in CCW order without collinear boundary points or repeats. Empty
/// for fewer than three non-collinear points.
pub fn convex_hull(points: &[Point]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..points.len()).collect();
    idx.sort_by(|&i, &j| {
        let (a, b) = (points[i], points[j]);
        a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
    });
    let turns_left = |chain: &[usize], k: usize| {
        let n = chain.len();
        orient2d(points[chain[n - 2]], points[chain[n - 1]], points[k]) > 0.0
    };
    let mut lower: Vec<usize> = Vec::with_capacity(idx.len());
    for &k in &idx {
        while lower.len() >= 2 && !turns_left(&lower, k) {
            lower.pop();
        }
        lower.push(k);
    }
    let mut upper: Vec<usize> = Vec::with_capacity(idx.len());
    for &k in idx.iter().rev() {
        while upper.len() >= 2 && !turns_left(&upper, k) {
            upper.pop();
        }
        upper.push(k);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return Vec::new();
    }
    hull
}

/// Area of a simple polygon given by point indices (positive when CCW).
/// Fanned from the first vertex, so far-from-origin polygons keep precision.
pub fn polygon_area(points: &[Point], ring: &[usize]) -> f64 {
    let Some((&first, rest)) = ring.split_first() else {
        return 0.0;
    };
    let o = points[first];
    let twice: f64 = rest
        .windows(2)
        .map(|w| signed_area2(o, points[w[0]], points[w[1]]))
        .sum();
    0.5 * twice
}
