//! Working mesh for incremental insertion.
//!
//! Triangles live in a slot vector (freed slots are reused in LIFO order) and
//! are indexed by their directed edges, so the triangle across an edge
//! `(a, b)` is the one owning `(b, a)`. Hull edges are closed by ghost
//! triangles `(a, b, GHOST)`; together with the real triangles they tile the
//! whole plane, which plays the role of an enclosing super-triangle.

use std::collections::HashMap;

use crate::geom::{in_circumcircle, in_open_halfplane, orient2d, GeomCfg};
use crate::types::Point;

/// Vertex at infinity. Only ever stored in the last slot of a triangle.
pub(crate) const GHOST: usize = usize::MAX;

pub(crate) type Tri = [usize; 3];

#[inline]
pub(crate) fn is_ghost(t: &Tri) -> bool {
    t[2] == GHOST
}

/// Rotate a triangle so that a ghost vertex (if any) is last; cyclic order
/// is preserved.
#[inline]
pub(crate) fn ghost_last(t: Tri) -> Tri {
    match t {
        [GHOST, b, c] => [b, c, GHOST],
        [a, GHOST, c] => [c, a, GHOST],
        t => t,
    }
}

/// Unordered pair of vertex indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Edge(pub usize, pub usize);

impl Edge {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a < b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }
}

#[inline]
pub(crate) fn directed_edges(t: &Tri) -> [(usize, usize); 3] {
    [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
}

pub(crate) struct WorkMesh<'a> {
    pts: &'a [Point],
    slots: Vec<Option<Tri>>,
    free: Vec<usize>,
    by_edge: HashMap<(usize, usize), usize>,
    alive: usize,
    /// Most recently created triangle; start of the next point-location walk.
    last: usize,
}

impl<'a> WorkMesh<'a> {
    /// Seed with one counter-clockwise triangle and its three ghosts.
    pub fn seed(pts: &'a [Point], tri: Tri) -> Self {
        let cap = 2 * pts.len() + 4;
        let mut mesh = Self {
            pts,
            slots: Vec::with_capacity(cap),
            free: Vec::new(),
            by_edge: HashMap::with_capacity(3 * cap),
            alive: 0,
            last: 0,
        };
        mesh.add(tri);
        for (a, b) in directed_edges(&tri) {
            mesh.add([b, a, GHOST]);
        }
        mesh.last = 0;
        mesh
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.alive
    }

    #[inline]
    pub fn points(&self) -> &'a [Point] {
        self.pts
    }

    #[inline]
    pub fn get(&self, id: usize) -> Option<Tri> {
        self.slots.get(id).copied().flatten()
    }

    /// Alive triangles in slot order.
    pub fn iter(&self) -> impl Iterator<Item = Tri> + '_ {
        self.slots.iter().filter_map(|s| *s)
    }

    pub fn add(&mut self, tri: Tri) -> usize {
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(tri);
                id
            }
            None => {
                self.slots.push(Some(tri));
                self.slots.len() - 1
            }
        };
        for e in directed_edges(&tri) {
            self.by_edge.insert(e, id);
        }
        self.alive += 1;
        self.last = id;
        id
    }

    pub fn remove(&mut self, id: usize) -> Option<Tri> {
        let tri = self.slots.get_mut(id)?.take()?;
        for e in directed_edges(&tri) {
            if self.by_edge.get(&e) == Some(&id) {
                self.by_edge.remove(&e);
            }
        }
        self.free.push(id);
        self.alive -= 1;
        Some(tri)
    }

    /// Triangle on the other side of directed edge `(a, b)` of some triangle.
    #[inline]
    pub fn across(&self, a: usize, b: usize) -> Option<usize> {
        self.by_edge.get(&(b, a)).copied()
    }

    #[inline]
    fn corners(&self, t: &Tri) -> [Point; 3] {
        [self.pts[t[0]], self.pts[t[1]], self.pts[t[2]]]
    }

    /// `p` lies in the (generalised) circumcircle of triangle `t`. Exact.
    pub fn conflicts(&self, t: &Tri, p: Point) -> bool {
        if is_ghost(t) {
            in_open_halfplane(self.pts[t[0]], self.pts[t[1]], p)
        } else {
            in_circumcircle(p, self.corners(t), GeomCfg::EXACT)
        }
    }

    /// Visibility walk from the last created triangle towards `p`.
    ///
    /// Returns the triangle containing `p`, or the first ghost crossed when
    /// `p` lies outside the hull. `None` if the walk exceeds `max_steps`.
    pub fn locate(&self, p: Point, max_steps: usize) -> Option<usize> {
        let mut id = self.last;
        let start = self.get(id)?;
        if is_ghost(&start) {
            id = self.across(start[0], start[1])?;
        }
        'walk: for _ in 0..max_steps {
            let t = self.get(id)?;
            if is_ghost(&t) {
                return Some(id);
            }
            for (a, b) in directed_edges(&t) {
                if orient2d(self.pts[a], self.pts[b], p) < 0.0 {
                    if let Some(next) = self.across(a, b) {
                        id = next;
                        continue 'walk;
                    }
                }
            }
            return Some(id);
        }
        None
    }

    /// First alive triangle (slot order) in conflict with `p`.
    pub fn scan_conflict(&self, p: Point) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .find_map(|(id, s)| match s {
                Some(t) if self.conflicts(t, p) => Some(id),
                _ => None,
            })
    }
}
