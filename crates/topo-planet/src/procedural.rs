//! Generated stand-ins for the elevation, color and bump images.
//!
//! All three are sampled from one fBm field over the unit sphere, so they
//! agree with each other. The elevation image is laid out in the geographic
//! projection used for displacement lookups; the color and bump images follow
//! the sphere mesh's texture coordinates.

use glam::DVec3;
use image::{Rgba, RgbaImage};
use noise::{NoiseFn, Simplex};
use topo_geo::{Uv, coordinate_to_point, uv_to_coordinate};
use topo_terrain::SphereMesh;

use crate::TextureKind;

const OCTAVES: u32 = 6;
const BASE_FREQUENCY: f64 = 1.5;
const LACUNARITY: f64 = 2.0;
const PERSISTENCE: f64 = 0.5;

const LOWLAND: [f64; 3] = [107.0, 46.0, 28.0];
const HIGHLAND: [f64; 3] = [200.0, 122.0, 74.0];
const ICE: [f64; 3] = [236.0, 232.0, 226.0];

/// Procedural planet textures. Width is configurable, height is half of it.
pub struct ProceduralTextures {
    noise: Simplex,
    detail: Simplex,
    width: u32,
}

impl ProceduralTextures {
    /// # Panics
    ///
    /// Panics if `width` is less than 2.
    pub fn new(seed: u32, width: u32) -> Self {
        assert!(width >= 2, "procedural texture width must be at least 2, got {width}");
        Self {
            noise: Simplex::new(seed),
            detail: Simplex::new(seed.wrapping_add(0x5EED_0B0B)),
            width,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        (self.width / 2).max(1)
    }

    /// Normalized elevation in \[0, 1\] for a unit direction.
    pub fn elevation_at(&self, dir: DVec3) -> f64 {
        let mut total = 0.0;
        let mut max = 0.0;
        let mut frequency = BASE_FREQUENCY;
        let mut amplitude = 1.0;

        for _ in 0..OCTAVES {
            let p = dir * frequency;
            total += self.noise.get([p.x, p.y, p.z]) * amplitude;
            max += amplitude;
            frequency *= LACUNARITY;
            amplitude *= PERSISTENCE;
        }

        (total / max * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Generate the image for one texture slot.
    pub fn generate(&self, kind: TextureKind) -> RgbaImage {
        match kind {
            TextureKind::Elevation => self.elevation(),
            TextureKind::Color => self.color(),
            TextureKind::Bump => self.bump(),
        }
    }

    /// Grayscale elevation in the geographic projection.
    ///
    /// Pixel `(x, y)` holds the elevation at `u = x / (w - 1)`,
    /// `v = y / (h - 1)`, matching how the sampler indexes, so the first and
    /// last columns both sit on the 180° meridian.
    pub fn elevation(&self) -> RgbaImage {
        let (w, h) = (self.width, self.height());
        let max_x = (w - 1) as f64;
        let max_y = (h - 1).max(1) as f64;
        RgbaImage::from_fn(w, h, |x, y| {
            let coord = uv_to_coordinate(Uv::new(x as f64 / max_x, y as f64 / max_y));
            let e = self.elevation_at(coord_direction(coord));
            let value = (e * 255.0).round() as u8;
            Rgba([value, value, value, 255])
        })
    }

    /// Color map in mesh texture space.
    pub fn color(&self) -> RgbaImage {
        self.mesh_space_image(|dir| {
            let e = self.elevation_at(dir);
            let mut rgb = lerp3(LOWLAND, HIGHLAND, e);
            let ice = ((dir.y.abs() - 0.88) / 0.06).clamp(0.0, 1.0);
            rgb = lerp3(rgb, ICE, ice);
            Rgba([rgb[0] as u8, rgb[1] as u8, rgb[2] as u8, 255])
        })
    }

    /// Bump map in mesh texture space: elevation plus fine surface grain.
    pub fn bump(&self) -> RgbaImage {
        self.mesh_space_image(|dir| {
            let p = dir * 24.0;
            let grain = self.detail.get([p.x, p.y, p.z]) * 0.15;
            let b = (self.elevation_at(dir) + grain).clamp(0.0, 1.0);
            let value = (b * 255.0).round() as u8;
            Rgba([value, value, value, 255])
        })
    }

    fn mesh_space_image(&self, texel: impl Fn(DVec3) -> Rgba<u8>) -> RgbaImage {
        let (w, h) = (self.width, self.height());
        RgbaImage::from_fn(w, h, |x, y| {
            let u = (x as f64 + 0.5) / w as f64;
            let v = (y as f64 + 0.5) / h as f64;
            texel(SphereMesh::uv_direction(u, v))
        })
    }
}

fn coord_direction(coord: topo_geo::GeoCoordinate) -> DVec3 {
    coordinate_to_point(coord, 1.0)
}

fn lerp3(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
