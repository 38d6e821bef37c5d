use std::path::PathBuf;

/// Errors raised while building, sampling or displacing terrain.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// A texture coordinate was non-finite or outside \[0, 1\].
    #[error("invalid texture coordinate ({u}, {v}): expected finite values in [0, 1]")]
    InvalidCoordinate { u: f64, v: f64 },

    /// Heightmap with no pixels.
    #[error("heightmap must be at least 1x1, got {width}x{height}")]
    EmptyHeightmap { width: u32, height: u32 },

    /// Raw pixel buffer does not match its declared dimensions.
    #[error("RGBA buffer for {width}x{height} needs {expected} bytes, got {actual}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The heightmap image could not be read or decoded.
    #[error("failed to load heightmap {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A displacement parameter is negative, zero where it must be positive, or not finite.
    #[error("invalid displacement parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// Too few segments to form a closed sphere.
    #[error("sphere resolution must be at least 3, got {0}")]
    InvalidResolution(u32),
}
