use std::path::PathBuf;

use topo_terrain::TerrainError;

use crate::TextureKind;

/// Errors raised while loading planet assets or building the planet.
#[derive(Debug, thiserror::Error)]
pub enum PlanetError {
    /// A build was attempted before all three textures were available.
    #[error("planet textures not ready: {missing} map still loading")]
    AssetNotReady { missing: TextureKind },

    /// A texture file could not be read or decoded.
    #[error("failed to load {kind} map {}: {source}", path.display())]
    TextureLoad {
        kind: TextureKind,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Mesh construction or displacement failed.
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}
