//! 2D Delaunay triangulation with a compact binary wire format.
//!
//! Layout
//! - `codec`: little-endian point-set, triangle and mesh-document buffers.
//! - `geom`: orientation, in-circumcircle and hull predicates under one
//!   tolerance config (`GeomCfg`).
//! - `delaunay`: incremental Bowyer-Watson engine and post-hoc validators.
//! - `pipeline`: fetch → decode → triangulate → encode against a
//!   `PointSetSource`, with response classes for a transport layer.
//! - `sample`: seeded random point sets.
//!
//! Every public operation is a pure function of its inputs; independent runs
//! may execute in parallel.

pub mod codec;
pub mod delaunay;
pub mod error;
pub mod geom;
pub mod pipeline;
pub mod sample;
pub mod types;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use delaunay::{triangulate, Triangulator, TriangulationStats};
pub use error::{Error, ErrorKind, InvalidValue, Result};
pub use geom::GeomCfg;
pub use types::{Point, PointSet, Triangle, TriangleMesh};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::codec::{
        decode_mesh, decode_pointset, decode_triangles, encode_mesh, encode_pointset,
        encode_triangles,
    };
    pub use crate::delaunay::{is_delaunay, triangulate, Triangulator, TriangulationStats};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::geom::GeomCfg;
    pub use crate::types::{Point, PointSet, Triangle, TriangleMesh};
}
