//! Point sets and triangle meshes.
//!
//! - `PointSet`: ordered points; the position of a point is its identity.
//! - `Triangle`: three point indices into the originating `PointSet`.
//! - `TriangleMesh`: ordered triangles from one triangulation run.

use nalgebra::Vector2;

use crate::error::{Axis, Error, InvalidValue, Result};

/// A planar point. Coordinates are expected to be finite.
pub type Point = Vector2<f64>;

/// Ordered sequence of points, indexed `0..len()` by arrival position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    pub points: Vec<Point>,
}

impl PointSet {
    #[inline]
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build from raw `(x, y)` pairs.
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| Vector2::new(x, y)).collect(),
        }
    }

    /// Build and reject NaN/∞ coordinates up front.
    pub fn try_new(points: Vec<Point>) -> Result<Self> {
        let set = Self { points };
        set.check_finite()?;
        Ok(set)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&Point> {
        self.points.get(i)
    }

    /// First non-finite coordinate, reported as `InvalidValue`.
    pub fn check_finite(&self) -> Result<()> {
        for (index, p) in self.points.iter().enumerate() {
            for (axis, value) in [(Axis::X, p.x), (Axis::Y, p.y)] {
                if !value.is_finite() {
                    return Err(Error::from(InvalidValue::NonFiniteCoordinate {
                        index,
                        axis,
                        value,
                    }));
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl std::ops::Index<usize> for PointSet {
    type Output = Point;
    #[inline]
    fn index(&self, i: usize) -> &Point {
        &self.points[i]
    }
}

/// Three point indices. Vertex order carries orientation only; as a set the
/// triangle is unordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triangle(pub [usize; 3]);

impl Triangle {
    #[inline]
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self([a, b, c])
    }

    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        self.0
    }

    /// Indices in ascending order (set identity of the triangle).
    #[inline]
    pub fn sorted(&self) -> [usize; 3] {
        let mut v = self.0;
        v.sort_unstable();
        v
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.0.contains(&i)
    }

    /// The repeated index, if any two vertices coincide.
    #[inline]
    pub fn repeated_index(&self) -> Option<usize> {
        let [a, b, c] = self.0;
        if a == b || a == c {
            Some(a)
        } else if b == c {
            Some(b)
        } else {
            None
        }
    }

    /// Edges in cyclic order `(a,b), (b,c), (c,a)`.
    #[inline]
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.0;
        [(a, b), (b, c), (c, a)]
    }
}

impl From<[usize; 3]> for Triangle {
    fn from(v: [usize; 3]) -> Self {
        Self(v)
    }
}

/// Ordered triangles produced by one triangulation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    #[inline]
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Order-independent form: each triangle's indices sorted, then triangles sorted.
    pub fn canonicalized(&self) -> TriangleMesh {
        let mut tris: Vec<Triangle> = self.triangles.iter().map(|t| Triangle(t.sorted())).collect();
        tris.sort_unstable();
        TriangleMesh { triangles: tris }
    }

    /// Set equality (ignores triangle order and vertex order).
    pub fn same_triangles(&self, other: &TriangleMesh) -> bool {
        self.canonicalized() == other.canonicalized()
    }

    /// Largest index referenced, if any.
    pub fn max_index(&self) -> Option<usize> {
        self.triangles.iter().flat_map(|t| t.0).max()
    }
}

impl From<Vec<Triangle>> for TriangleMesh {
    fn from(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

impl<'a> IntoIterator for &'a TriangleMesh {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;
    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
