//! Heightmap-driven terrain displacement for UV sphere meshes.
//!
//! A [`SphereMesh`] is built once per rebuild, then [`displace`] pushes each
//! vertex outwards along its direction by an amount read from a
//! [`Heightmap`], and finally recomputes vertex normals.

mod displacement;
mod error;
mod heightmap;
mod mesh;
mod sphere;

pub use displacement::{DisplacementParams, DisplacementReport, displace, displace_vertex};
pub use error::TerrainError;
pub use heightmap::Heightmap;
pub use mesh::{PositionBuffer, compute_vertex_normals};
pub use sphere::SphereMesh;
