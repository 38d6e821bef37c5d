//! Planet assembly: textures, displaced geometry and the interactive
//! parameters that drive rebuilds.
//!
//! [`PlanetAssets`] loads the elevation, color and bump images one after
//! another. Once they are all available, [`ParameterController`] builds a
//! [`PlanetBuild`] and rebuilds it wholesale whenever a geometry parameter
//! changes.

mod assembly;
mod assets;
mod controller;
mod error;
mod procedural;

pub use assembly::{GlowSettings, PlanetBuild, PlanetShape, PlanetTransform, SurfaceMaterial};
pub use assets::{LoadProgress, PlanetAssets, TextureKind, TextureSet, TextureSource};
pub use controller::{Parameter, ParameterController, PlanetParameters, RebuildOutcome};
pub use error::PlanetError;
pub use procedural::ProceduralTextures;
