//! Binary codec for point sets and triangle lists.
//!
//! Formats (little-endian)
//! - Point set: `u32 count` then `count × (f64 x, f64 y)`.
//! - Triangles: `u32 count` then `count × (u32 i0, u32 i1, u32 i2)`.
//! - Mesh document: a point set immediately followed by a triangle section
//!   whose indices refer to that point set.
//!
//! Validation policy
//! - All checks happen here, at the boundary. Decoded values are finite,
//!   in range and free of repeated indices, so the engine never re-checks.
//! - Buffers are exact: short input is `TruncatedBuffer`, surplus bytes are
//!   `InvalidValue::CountMismatch`.

mod wire;

use nalgebra::Vector2;

use crate::error::{Error, InvalidValue, Result};
use crate::types::{PointSet, Triangle, TriangleMesh};

pub use wire::{COUNT_SIZE, POINT_SIZE, TRIANGLE_SIZE};
use wire::{count_header, put_f64, put_u32, section_len, Reader};

/// Encoded size of a point set with `n` points (`None` on overflow).
#[inline]
pub fn encoded_pointset_len(n: usize) -> Option<usize> {
    section_len(n, POINT_SIZE)
}

/// Encoded size of a triangle section with `n` triangles (`None` on overflow).
#[inline]
pub fn encoded_triangles_len(n: usize) -> Option<usize> {
    section_len(n, TRIANGLE_SIZE)
}

/// Encode a point set. Fails on NaN/∞ coordinates.
pub fn encode_pointset(points: &PointSet) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_pointset_len(points.len()).unwrap_or(0));
    write_pointset(&mut out, points)?;
    Ok(out)
}

/// Decode a point set; the buffer must contain exactly one point-set section.
pub fn decode_pointset(bytes: &[u8]) -> Result<PointSet> {
    let mut r = Reader::new(bytes);
    let points = read_pointset(&mut r)?;
    r.finish()?;
    tracing::trace!(points = points.len(), bytes = bytes.len(), "decoded point set");
    Ok(points)
}

/// Encode triangles built against `point_count` points.
pub fn encode_triangles(mesh: &TriangleMesh, point_count: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_triangles_len(mesh.len()).unwrap_or(0));
    write_triangles(&mut out, mesh, point_count)?;
    Ok(out)
}

/// Decode a triangle section and validate it against `point_count`.
pub fn decode_triangles(bytes: &[u8], point_count: usize) -> Result<TriangleMesh> {
    let mut r = Reader::new(bytes);
    let mesh = read_triangles(&mut r, point_count)?;
    r.finish()?;
    Ok(mesh)
}

/// Encode a mesh document: the point set followed by its triangles.
pub fn encode_mesh(points: &PointSet, mesh: &TriangleMesh) -> Result<Vec<u8>> {
    let cap = encoded_pointset_len(points.len())
        .zip(encoded_triangles_len(mesh.len()))
        .and_then(|(a, b)| a.checked_add(b))
        .unwrap_or(0);
    let mut out = Vec::with_capacity(cap);
    write_pointset(&mut out, points)?;
    write_triangles(&mut out, mesh, points.len())?;
    Ok(out)
}

/// Decode a mesh document produced by [`encode_mesh`].
pub fn decode_mesh(bytes: &[u8]) -> Result<(PointSet, TriangleMesh)> {
    let mut r = Reader::new(bytes);
    let points = read_pointset(&mut r)?;
    let mesh = read_triangles(&mut r, points.len())?;
    r.finish()?;
    Ok((points, mesh))
}

fn write_pointset(out: &mut Vec<u8>, points: &PointSet) -> Result<()> {
    points.check_finite()?;
    put_u32(out, count_header(points.len())?);
    for p in points.iter() {
        put_f64(out, p.x);
        put_f64(out, p.y);
    }
    Ok(())
}

fn read_pointset(r: &mut Reader<'_>) -> Result<PointSet> {
    let count = r.read_u32()? as usize;
    let body = count.checked_mul(POINT_SIZE).ok_or(Error::TruncatedBuffer {
        needed: usize::MAX,
        available: r.position() + r.remaining(),
    })?;
    r.require(body)?;
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        let x = r.read_f64()?;
        let y = r.read_f64()?;
        points.push(Vector2::new(x, y));
    }
    let set = PointSet::new(points);
    set.check_finite()?;
    Ok(set)
}

/// Bounds, repeated-index and `u32` checks for every triangle.
fn check_triangles(mesh: &TriangleMesh, point_count: usize) -> Result<()> {
    for (ti, t) in mesh.iter().enumerate() {
        check_triangle(ti, t, point_count)?;
    }
    Ok(())
}

fn check_triangle(ti: usize, t: &Triangle, point_count: usize) -> Result<()> {
    for index in t.indices() {
        if index >= point_count || u32::try_from(index).is_err() {
            return Err(Error::IndexOutOfRange {
                triangle: ti,
                index,
                point_count,
            });
        }
    }
    if let Some(index) = t.repeated_index() {
        return Err(Error::from(InvalidValue::RepeatedIndex { triangle: ti, index }));
    }
    Ok(())
}

fn write_triangles(out: &mut Vec<u8>, mesh: &TriangleMesh, point_count: usize) -> Result<()> {
    check_triangles(mesh, point_count)?;
    put_u32(out, count_header(mesh.len())?);
    for t in mesh.iter() {
        for index in t.indices() {
            // in range of u32 after check_triangles
            put_u32(out, index as u32);
        }
    }
    Ok(())
}

fn read_triangles(r: &mut Reader<'_>, point_count: usize) -> Result<TriangleMesh> {
    let count = r.read_u32()? as usize;
    let body = count.checked_mul(TRIANGLE_SIZE).ok_or(Error::TruncatedBuffer {
        needed: usize::MAX,
        available: r.position() + r.remaining(),
    })?;
    r.require(body)?;
    let mut triangles = Vec::with_capacity(count);
    for ti in 0..count {
        let a = r.read_u32()? as usize;
        let b = r.read_u32()? as usize;
        let c = r.read_u32()? as usize;
        let t = Triangle::new(a, b, c);
        check_triangle(ti, &t, point_count)?;
        triangles.push(t);
    }
    Ok(TriangleMesh::new(triangles))
}
