//! Latitude/longitude tessellated UV sphere.

use std::f64::consts::{PI, TAU};

use glam::DVec3;

use crate::{PositionBuffer, TerrainError, compute_vertex_normals};

/// Indexed UV sphere with positions, normals and texture coordinates.
///
/// Vertices form a `(resolution + 1) x (resolution + 1)` grid, row 0 at the
/// north pole. Each row repeats its first vertex at the end so the texture
/// seam has its own column, and pole rows are full rows of coincident
/// vertices. The vertex count is fixed at construction.
///
/// Texture coordinates follow image rows: `v = 0` is the north pole. `u = 0`
/// lies on -X and `u` grows towards +Z, so color maps are offset a quarter
/// turn from the geographic projection used for elevation lookups.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
    resolution: u32,
    radius: f32,
    positions_dirty: bool,
}

impl SphereMesh {
    /// Build a sphere with `resolution` segments around and `resolution` rings
    /// from pole to pole.
    pub fn uv_sphere(radius: f32, resolution: u32) -> Result<Self, TerrainError> {
        if resolution < 3 {
            return Err(TerrainError::InvalidResolution(resolution));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(TerrainError::InvalidParameter {
                name: "radius",
                value: radius,
            });
        }

        let segments = resolution as usize;
        let row_len = segments + 1;
        let vertex_count = row_len * row_len;
        let r = radius as f64;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for iy in 0..=segments {
            let v = iy as f64 / segments as f64;
            // Pole vertices sit in the middle of their triangle's texel span.
            let u_offset = if iy == 0 {
                0.5 / segments as f64
            } else if iy == segments {
                -0.5 / segments as f64
            } else {
                0.0
            };
            let (sin_theta, cos_theta) = (v * PI).sin_cos();

            for ix in 0..=segments {
                let u = ix as f64 / segments as f64;
                let (sin_phi, cos_phi) = (u * TAU).sin_cos();

                let x = -r * cos_phi * sin_theta;
                let y = r * cos_theta;
                let z = r * sin_phi * sin_theta;
                positions.push([x as f32, y as f32, z as f32]);
                normals.push([(x / r) as f32, (y / r) as f32, (z / r) as f32]);
                uvs.push([(u + u_offset) as f32, v as f32]);
            }
        }

        let mut indices = Vec::with_capacity(segments * (segments - 1) * 6);
        let at = |iy: usize, ix: usize| (iy * row_len + ix) as u32;
        for iy in 0..segments {
            for ix in 0..segments {
                let a = at(iy, ix + 1);
                let b = at(iy, ix);
                let c = at(iy + 1, ix);
                let d = at(iy + 1, ix + 1);
                // Skip the zero-area half of each pole quad.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Ok(Self {
            positions,
            normals,
            uvs,
            indices,
            resolution,
            radius,
            positions_dirty: true,
        })
    }

    /// Unit direction of the surface point a texture coordinate maps to.
    ///
    /// Inverse of the UV layout used by [`SphereMesh::uv_sphere`] away from
    /// the poles, for generating textures that line up with the mesh.
    pub fn uv_direction(u: f64, v: f64) -> DVec3 {
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        let (sin_phi, cos_phi) = (u * TAU).sin_cos();
        DVec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta)
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Radius the sphere was built with, before any displacement.
    pub fn base_radius(&self) -> f32 {
        self.radius
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether positions changed since the last [`SphereMesh::take_dirty`].
    pub fn is_dirty(&self) -> bool {
        self.positions_dirty
    }

    /// Return and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.positions_dirty)
    }
}

impl PositionBuffer for SphereMesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn position(&self, index: usize) -> [f32; 3] {
        self.positions[index]
    }

    fn set_position(&mut self, index: usize, position: [f32; 3]) {
        self.positions[index] = position;
    }

    fn mark_positions_dirty(&mut self) {
        self.positions_dirty = true;
    }

    fn recompute_normals(&mut self) {
        compute_vertex_normals(&self.positions, &self.indices, &mut self.normals);
    }
}
