//! Fetch → decode → triangulate → encode, with the failure classes a
//! transport maps to responses.
//!
//! The pipeline is transport-neutral: an upstream point-set store is any
//! `PointSetSource`, and `Pipeline::run` returns an `Outcome` whose
//! `ResponseClass` carries the HTTP-style status and string code.

use std::fmt;

use crate::codec::{decode_pointset, encode_mesh, encode_triangles};
use crate::delaunay::Triangulator;
use crate::error::Result;
use crate::geom::GeomCfg;

/// Upstream failure while fetching a point set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("point set {0:?} not found")]
    NotFound(String),
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("upstream timed out: {0}")]
    Timeout(String),
}

/// Store of encoded point sets, addressed by id.
pub trait PointSetSource {
    fn fetch(&self, id: &str) -> Result<Vec<u8>, SourceError>;
}

impl<S: PointSetSource + ?Sized> PointSetSource for &S {
    fn fetch(&self, id: &str) -> Result<Vec<u8>, SourceError> {
        (**self).fetch(id)
    }
}

/// Decode a point-set buffer, triangulate it, encode the triangle buffer.
pub fn triangulate_bytes(raw: &[u8], cfg: GeomCfg) -> Result<Vec<u8>> {
    let points = decode_pointset(raw)?;
    let mesh = Triangulator::new(cfg).triangulate(&points)?;
    encode_triangles(&mesh, points.len())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    Ok,
    NotFound,
    InvalidInput,
    BadGateway,
    Timeout,
    TriangulationFailed,
    EncodingFailed,
}

impl ResponseClass {
    pub fn status_code(self) -> u16 {
        match self {
            ResponseClass::Ok => 200,
            ResponseClass::NotFound => 404,
            ResponseClass::InvalidInput => 422,
            ResponseClass::BadGateway => 502,
            ResponseClass::Timeout => 504,
            ResponseClass::TriangulationFailed | ResponseClass::EncodingFailed => 500,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ResponseClass::Ok => "OK",
            ResponseClass::NotFound => "POINTSET_NOT_FOUND",
            ResponseClass::InvalidInput => "INVALID_POINTSET_DATA",
            ResponseClass::BadGateway => "UPSTREAM_UNAVAILABLE",
            ResponseClass::Timeout => "UPSTREAM_TIMEOUT",
            ResponseClass::TriangulationFailed => "TRIANGULATION_FAILED",
            ResponseClass::EncodingFailed => "ENCODING_FAILED",
        }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self == ResponseClass::Ok
    }
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status_code(), self.code())
    }
}

/// Result of one pipeline run. `body` holds the mesh document on success and
/// is empty otherwise; `message` is human-readable and empty on success.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub class: ResponseClass,
    pub body: Vec<u8>,
    pub message: String,
}

impl Outcome {
    fn ok(body: Vec<u8>) -> Self {
        Self {
            class: ResponseClass::Ok,
            body,
            message: String::new(),
        }
    }

    fn fail(class: ResponseClass, message: impl Into<String>) -> Self {
        Self {
            class,
            body: Vec::new(),
            message: message.into(),
        }
    }
}

pub struct Pipeline<S> {
    source: S,
    triangulator: Triangulator,
}

impl<S: PointSetSource> Pipeline<S> {
    pub fn new(source: S, cfg: GeomCfg) -> Self {
        Self {
            source,
            triangulator: Triangulator::new(cfg),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch point set `id` and answer with a mesh document (points followed
    /// by triangles).
    #[tracing::instrument(skip(self))]
    pub fn run(&self, id: &str) -> Outcome {
        let raw = match self.source.fetch(id) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "fetch failed");
                let class = match e {
                    SourceError::NotFound(_) => ResponseClass::NotFound,
                    SourceError::Unavailable(_) => ResponseClass::BadGateway,
                    SourceError::Timeout(_) => ResponseClass::Timeout,
                };
                return Outcome::fail(class, e.to_string());
            }
        };
        let points = match decode_pointset(&raw) {
            Ok(p) => p,
            Err(e) => {
                tracing::info!(error = %e, bytes = raw.len(), "rejecting point set");
                return Outcome::fail(
                    ResponseClass::InvalidInput,
                    format!("cannot decode point set {id:?}: {e}"),
                );
            }
        };
        let mesh = match self.triangulator.triangulate(&points) {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(error = %e, points = points.len(), "triangulation failed");
                return Outcome::fail(
                    ResponseClass::TriangulationFailed,
                    "triangulation could not be computed for the given point set",
                );
            }
        };
        match encode_mesh(&points, &mesh) {
            Ok(body) => {
                tracing::debug!(triangles = mesh.len(), bytes = body.len(), "triangulated");
                Outcome::ok(body)
            }
            Err(e) => {
                tracing::error!(error = %e, kind = ?e.kind(), "encoding failed");
                Outcome::fail(
                    ResponseClass::EncodingFailed,
                    "failed to encode triangulation result",
                )
            }
        }
    }
}
