//! Nearest-neighbor elevation sampling from a decoded RGBA image.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use topo_geo::Uv;

use crate::TerrainError;

/// A decoded elevation image. Only the red channel is read.
///
/// Read-only once constructed; the displacement engine borrows it for the
/// duration of a pass.
#[derive(Clone, Debug)]
pub struct Heightmap {
    image: RgbaImage,
}

impl Heightmap {
    /// Wrap an RGBA image. Fails if either dimension is zero.
    pub fn new(image: RgbaImage) -> Result<Self, TerrainError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyHeightmap { width, height });
        }
        Ok(Self { image })
    }

    /// Build from a raw row-major RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TerrainError> {
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels).ok_or(TerrainError::BufferSize {
            width,
            height,
            expected,
            actual,
        })?;
        Self::new(image)
    }

    /// Convert any decoded image to RGBA8.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, TerrainError> {
        Self::new(image.into_rgba8())
    }

    /// Decode an image file (PNG or JPEG).
    pub fn open(path: &Path) -> Result<Self, TerrainError> {
        let image = image::open(path).map_err(|source| TerrainError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_dynamic(image)
    }

    /// A heightmap where every pixel has the same elevation.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is zero.
    pub fn uniform(width: u32, height: u32, value: u8) -> Self {
        assert!(
            width > 0 && height > 0,
            "heightmap must be at least 1x1, got {width}x{height}"
        );
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba([value, value, value, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The underlying pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel column and row for an in-range UV: `floor(u * (w - 1))`, `floor(v * (h - 1))`.
    pub fn pixel_coords(&self, u: f64, v: f64) -> (u32, u32) {
        let max_x = self.width() - 1;
        let max_y = self.height() - 1;
        let x = (u * max_x as f64).floor() as u32;
        let y = (v * max_y as f64).floor() as u32;
        (x.min(max_x), y.min(max_y))
    }

    /// Elevation in \[0, 1\] at `(u, v)`, rejecting coordinates outside the image.
    pub fn try_sample(&self, u: f64, v: f64) -> Result<f32, TerrainError> {
        if !Uv::new(u, v).in_range() {
            return Err(TerrainError::InvalidCoordinate { u, v });
        }
        Ok(self.read(u, v))
    }

    /// Elevation in \[0, 1\] at `(u, v)`.
    ///
    /// Coordinates are clamped into \[0, 1\] first and non-finite values map
    /// to 0, so this never indexes outside the image. Sampling just past
    /// either horizontal edge reads the edge column.
    pub fn sample(&self, u: f64, v: f64) -> f32 {
        self.read(clamp_unit(u), clamp_unit(v))
    }

    /// [`Heightmap::sample`] for a projected [`Uv`].
    pub fn sample_uv(&self, uv: Uv) -> f32 {
        self.sample(uv.u, uv.v)
    }

    fn read(&self, u: f64, v: f64) -> f32 {
        let (x, y) = self.pixel_coords(u, v);
        self.image.get_pixel(x, y)[0] as f32 / 255.0
    }
}

fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}
