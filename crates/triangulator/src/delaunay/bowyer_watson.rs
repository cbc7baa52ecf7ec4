//! Bowyer-Watson insertion step: conflict region, cavity boundary, re-fill.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};

use super::mesh::{directed_edges, ghost_last, Edge, Tri, WorkMesh, GHOST};
use super::TriangulationStats;

/// Boundary of a union of triangles: edges used by exactly one of them.
///
/// Counts are kept in a fresh map keyed by unordered pair; edges are then
/// emitted in the order they appear in `tris`, keeping each triangle's
/// direction, so the result is deterministic and every boundary edge keeps
/// the cavity on its left.
pub(crate) fn cavity_boundary(tris: &[Tri]) -> Vec<(usize, usize)> {
    let mut counts: HashMap<Edge, u32> = HashMap::with_capacity(tris.len() * 3);
    for t in tris {
        for (a, b) in directed_edges(t) {
            *counts.entry(Edge::new(a, b)).or_insert(0) += 1;
        }
    }
    tris.iter()
        .flat_map(directed_edges)
        .filter(|&(a, b)| counts.get(&Edge::new(a, b)) == Some(&1))
        .collect()
}

/// Outcome of inserting one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Inserted {
    /// Cavity of `removed` triangles re-filled with `created` new ones.
    Cavity { removed: usize, created: usize },
    /// Point has the exact coordinates of an inserted vertex.
    Duplicate,
}

/// Insert point `pi` into the mesh.
///
/// Nothing is modified unless the conflict region is a topological disk
/// (`k` triangles, `k + 2` boundary edges); anything else is reported as
/// `AlgorithmInvariantViolation`.
pub(crate) fn insert_point(
    mesh: &mut WorkMesh<'_>,
    pi: usize,
    stats: &mut TriangulationStats,
) -> Result<Inserted> {
    let pts = mesh.points();
    let p = pts[pi];
    let max_steps = mesh.len() + 3;
    let located = mesh.locate(p, max_steps).and_then(|id| Some((id, mesh.get(id)?)));
    let start = match located {
        Some((id, t)) if mesh.conflicts(&t, p) => id,
        Some((_, t)) if t.iter().any(|&v| v != GHOST && pts[v] == p) => {
            return Ok(Inserted::Duplicate);
        }
        _ => {
            stats.locate_fallbacks += 1;
            tracing::debug!(point = pi, "walk failed, scanning for a conflict");
            match mesh.scan_conflict(p) {
                Some(id) => id,
                None => return Ok(Inserted::Duplicate),
            }
        }
    };

    // Conflict region: flood from `start` across edges into conflicting triangles.
    let mut bad_ids = vec![start];
    let mut seen: HashSet<usize> = HashSet::from([start]);
    let mut k = 0;
    while k < bad_ids.len() {
        let Some(t) = mesh.get(bad_ids[k]) else {
            break;
        };
        for (a, b) in directed_edges(&t) {
            let Some(nb) = mesh.across(a, b) else {
                continue;
            };
            if seen.insert(nb) && mesh.get(nb).is_some_and(|u| mesh.conflicts(&u, p)) {
                bad_ids.push(nb);
            }
        }
        k += 1;
    }
    let bad: Vec<Tri> = bad_ids.iter().filter_map(|&id| mesh.get(id)).collect();

    let boundary = cavity_boundary(&bad);
    // a disk-shaped cavity of k triangles has k + 2 boundary edges
    if boundary.len() != bad.len() + 2 {
        tracing::error!(
            point = pi,
            bad = bad.len(),
            boundary = boundary.len(),
            "cavity is not a topological disk"
        );
        return Err(Error::AlgorithmInvariantViolation(format!(
            "inserting point {pi}: {} conflicting triangles have {} boundary edges, expected {}",
            bad.len(),
            boundary.len(),
            bad.len() + 2
        )));
    }

    for &id in &bad_ids {
        mesh.remove(id);
    }
    for &(a, b) in &boundary {
        mesh.add(ghost_last([a, b, pi]));
    }
    tracing::trace!(point = pi, removed = bad.len(), created = boundary.len(), "inserted");
    Ok(Inserted::Cavity {
        removed: bad.len(),
        created: boundary.len(),
    })
}
