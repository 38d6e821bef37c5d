//! Sequenced loading of the three planet textures.
//!
//! Textures load strictly in order: elevation, then color, then bump. Each
//! call to [`PlanetAssets::poll`] loads exactly one, so the frame loop keeps
//! running between loads. Nothing can be built until all three are present.

use std::fmt;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use topo_config::TextureConfig;
use topo_terrain::Heightmap;
use tracing::{info, warn};

use crate::{PlanetError, ProceduralTextures};

/// One of the three planet texture slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureKind {
    /// Elevation map. Only its red channel is read.
    Elevation,
    Color,
    Bump,
}

impl TextureKind {
    /// The order textures are loaded in.
    pub const LOAD_ORDER: [TextureKind; 3] =
        [TextureKind::Elevation, TextureKind::Color, TextureKind::Bump];
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextureKind::Elevation => "elevation",
            TextureKind::Color => "color",
            TextureKind::Bump => "bump",
        })
    }
}

/// Where textures come from.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    Files {
        elevation: PathBuf,
        color: PathBuf,
        bump: PathBuf,
    },
    Procedural {
        seed: u32,
        width: u32,
    },
}

impl TextureSource {
    /// Pick a source from config. Falls back to procedural textures when any
    /// configured file is missing.
    pub fn from_config(config: &TextureConfig) -> Self {
        let procedural = TextureSource::Procedural {
            seed: config.procedural_seed,
            width: config.procedural_width.max(2),
        };
        if config.procedural {
            return procedural;
        }

        let files = [&config.elevation, &config.color, &config.bump];
        if let Some(missing) = files.iter().find(|p| !p.exists()) {
            warn!(
                path = %missing.display(),
                "planet texture not found, using procedural textures"
            );
            return procedural;
        }

        TextureSource::Files {
            elevation: config.elevation.clone(),
            color: config.color.clone(),
            bump: config.bump.clone(),
        }
    }
}

/// The three decoded textures a planet build needs.
#[derive(Clone, Debug)]
pub struct TextureSet {
    pub elevation: Heightmap,
    pub color: RgbaImage,
    pub bump: RgbaImage,
}

/// Result of one [`PlanetAssets::poll`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadProgress {
    /// One more texture finished loading.
    Loaded(TextureKind),
    /// All textures were already loaded; nothing was done.
    Complete,
}

#[derive(Default)]
struct Partial {
    elevation: Option<Heightmap>,
    color: Option<RgbaImage>,
}

/// Planet textures, loaded one at a time.
pub struct PlanetAssets {
    source: TextureSource,
    procedural: Option<ProceduralTextures>,
    partial: Partial,
    set: Option<TextureSet>,
}

impl PlanetAssets {
    pub fn new(source: TextureSource) -> Self {
        let procedural = match source {
            TextureSource::Procedural { seed, width } => Some(ProceduralTextures::new(seed, width)),
            TextureSource::Files { .. } => None,
        };
        Self {
            source,
            procedural,
            partial: Partial::default(),
            set: None,
        }
    }

    /// Assets that are ready from the start.
    pub fn from_set(set: TextureSet) -> Self {
        Self {
            source: TextureSource::Procedural { seed: 0, width: 2 },
            procedural: None,
            partial: Partial::default(),
            set: Some(set),
        }
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn is_ready(&self) -> bool {
        self.set.is_some()
    }

    /// All three textures, once loaded.
    pub fn textures(&self) -> Option<&TextureSet> {
        self.set.as_ref()
    }

    /// The next texture that still has to load.
    pub fn next_missing(&self) -> Option<TextureKind> {
        if self.set.is_some() {
            None
        } else if self.partial.elevation.is_none() {
            Some(TextureKind::Elevation)
        } else if self.partial.color.is_none() {
            Some(TextureKind::Color)
        } else {
            Some(TextureKind::Bump)
        }
    }

    /// Load the next texture in order. A failed load leaves earlier textures
    /// in place and is not retried.
    pub fn poll(&mut self) -> Result<LoadProgress, PlanetError> {
        let Some(kind) = self.next_missing() else {
            return Ok(LoadProgress::Complete);
        };

        let image = self.load(kind)?;
        info!(
            texture = %kind,
            width = image.width(),
            height = image.height(),
            "loaded planet texture"
        );

        match kind {
            TextureKind::Elevation => self.partial.elevation = Some(Heightmap::new(image)?),
            TextureKind::Color => self.partial.color = Some(image),
            TextureKind::Bump => {
                let partial = std::mem::take(&mut self.partial);
                if let (Some(elevation), Some(color)) = (partial.elevation, partial.color) {
                    self.set = Some(TextureSet {
                        elevation,
                        color,
                        bump: image,
                    });
                    // The generator is only needed until the set is complete.
                    self.procedural = None;
                }
            }
        }

        Ok(LoadProgress::Loaded(kind))
    }

    /// Load every remaining texture.
    pub fn load_all(&mut self) -> Result<&TextureSet, PlanetError> {
        while self.poll()? != LoadProgress::Complete {}
        self.set.as_ref().ok_or(PlanetError::AssetNotReady {
            missing: TextureKind::Elevation,
        })
    }

    fn load(&self, kind: TextureKind) -> Result<RgbaImage, PlanetError> {
        match (&self.source, &self.procedural) {
            (TextureSource::Files { elevation, color, bump }, _) => {
                let path = match kind {
                    TextureKind::Elevation => elevation,
                    TextureKind::Color => color,
                    TextureKind::Bump => bump,
                };
                load_image(kind, path)
            }
            (TextureSource::Procedural { .. }, Some(generator)) => Ok(generator.generate(kind)),
            (TextureSource::Procedural { .. }, None) => {
                Err(PlanetError::AssetNotReady { missing: kind })
            }
        }
    }
}

fn load_image(kind: TextureKind, path: &Path) -> Result<RgbaImage, PlanetError> {
    image::open(path)
        .map(|img| img.into_rgba8())
        .map_err(|source| PlanetError::TextureLoad {
            kind,
            path: path.to_path_buf(),
            source,
        })
}
