//! Geographic coordinate mapping for sphere meshes.
//!
//! Converts between unit-sphere directions, latitude/longitude and
//! equirectangular texture coordinates. All math is done in `f64`.
//!
//! Axis convention: +Y is north, longitude 0 lies on +Z and increases
//! towards +X.

mod coordinate;
mod projection;

pub use coordinate::{GeoCoordinate, coordinate_to_point, point_to_coordinate};
pub use projection::{Uv, project, uv_to_coordinate};
