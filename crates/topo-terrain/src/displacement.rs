//! Radial vertex displacement driven by a heightmap.
//!
//! Each vertex direction is converted to latitude/longitude, projected to
//! the elevation image, and pushed out to
//! `radius * (1 + height * displacement_multiplier)`.

use std::time::{Duration, Instant};

use glam::DVec3;
use topo_geo::{coordinate_to_point, point_to_coordinate, project};
use tracing::{debug, info};

use crate::{Heightmap, PositionBuffer, TerrainError};

/// Inputs to one displacement pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementParams {
    /// Base sphere radius.
    pub radius: f32,
    /// Height exaggeration; 0 leaves the sphere undisplaced.
    pub displacement_multiplier: f32,
    /// Bump map strength. Not used for geometry, carried to the surface material.
    pub bump_scale: f32,
}

impl DisplacementParams {
    /// # Panics
    ///
    /// Panics if `radius` is not positive and finite, or if either scale is
    /// negative or not finite.
    pub fn new(radius: f32, displacement_multiplier: f32, bump_scale: f32) -> Self {
        let params = Self {
            radius,
            displacement_multiplier,
            bump_scale,
        };
        if let Err(e) = params.validate() {
            panic!("{e}");
        }
        params
    }

    /// Check the ranges without panicking.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "radius",
                value: self.radius,
            });
        }
        if !(self.displacement_multiplier.is_finite() && self.displacement_multiplier >= 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "displacement_multiplier",
                value: self.displacement_multiplier,
            });
        }
        if !(self.bump_scale.is_finite() && self.bump_scale >= 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "bump_scale",
                value: self.bump_scale,
            });
        }
        Ok(())
    }

    /// Distance from the center for a normalized height `h`.
    pub fn displaced_radius(&self, height: f32) -> f64 {
        self.radius as f64 * (1.0 + height as f64 * self.displacement_multiplier as f64)
    }
}

/// Summary of a completed displacement pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplacementReport {
    pub vertex_count: usize,
    /// Zero-length input positions, left where they were.
    pub degenerate_count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub elapsed: Duration,
}

/// Displace one base position. `None` if the position has no direction.
pub fn displace_vertex(
    position: [f32; 3],
    heightmap: &Heightmap,
    params: &DisplacementParams,
) -> Option<(DVec3, f64)> {
    let direction = DVec3::new(position[0] as f64, position[1] as f64, position[2] as f64)
        .try_normalize()?;

    let coord = point_to_coordinate(direction);
    let uv = project(coord);
    debug_assert!(uv.in_range(), "projected {uv:?} from {direction:?}");

    let height = heightmap.sample_uv(uv);
    let radius = params.displaced_radius(height);
    Some((coordinate_to_point(coord, radius), radius))
}

/// Displace every vertex of `mesh` in place, then recompute its normals.
///
/// The pass is all-or-nothing: parameters are validated before the first
/// write, and nothing after that can fail. Normals are rebuilt once after all
/// positions are written.
pub fn displace<M>(
    mesh: &mut M,
    heightmap: &Heightmap,
    params: &DisplacementParams,
) -> Result<DisplacementReport, TerrainError>
where
    M: PositionBuffer + ?Sized,
{
    params.validate()?;

    let start = Instant::now();
    let vertex_count = mesh.vertex_count();
    let mut degenerate_count = 0;
    let mut min_radius = f64::INFINITY;
    let mut max_radius = f64::NEG_INFINITY;

    for i in 0..vertex_count {
        match displace_vertex(mesh.position(i), heightmap, params) {
            Some((point, radius)) => {
                mesh.set_position(i, [point.x as f32, point.y as f32, point.z as f32]);
                min_radius = min_radius.min(radius);
                max_radius = max_radius.max(radius);
            }
            None => degenerate_count += 1,
        }
    }

    mesh.mark_positions_dirty();
    mesh.recompute_normals();

    if min_radius > max_radius {
        min_radius = 0.0;
        max_radius = 0.0;
    }

    let report = DisplacementReport {
        vertex_count,
        degenerate_count,
        min_radius,
        max_radius,
        elapsed: start.elapsed(),
    };

    if degenerate_count > 0 {
        debug!(degenerate_count, "skipped zero-length vertices");
    }
    info!(
        vertices = vertex_count,
        min_radius = report.min_radius,
        max_radius = report.max_radius,
        multiplier = params.displacement_multiplier,
        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
        "displaced terrain"
    );

    Ok(report)
}
