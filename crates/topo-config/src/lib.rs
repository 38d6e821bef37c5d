//! Configuration for the topo globe viewer.
//!
//! Settings persist to disk as RON, can be overridden from the command line
//! via clap, and can be hot-reloaded. Unknown and missing fields are tolerated
//! so older config files keep loading.

mod cli;
mod color;
mod config;
mod error;

pub use cli::CliArgs;
pub use color::{hex_to_linear, srgb_to_linear};
pub use config::{
    CameraDistance, Config, DebugConfig, InputConfig, MAX_RESOLUTION, PlanetConfig, PlanetPreset,
    RenderConfig, StarfieldConfig, TextureConfig, WindowConfig,
};
pub use error::ConfigError;
