//! Command-line argument parsing for the globe viewer.

use std::path::PathBuf;

use clap::Parser;

use crate::{Config, PlanetConfig, PlanetPreset};

/// Topo globe command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "topo-globe", about = "Interactive heightmap-displaced planet viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Planet preset (standard, lite). Applied before the other planet overrides.
    #[arg(long)]
    pub preset: Option<PlanetPreset>,

    /// Sphere tessellation resolution.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Planet radius.
    #[arg(long)]
    pub radius: Option<f32>,

    /// Elevation (topographic) map path.
    #[arg(long)]
    pub elevation: Option<PathBuf>,

    /// Color map path.
    #[arg(long)]
    pub color: Option<PathBuf>,

    /// Bump map path.
    #[arg(long)]
    pub bump: Option<PathBuf>,

    /// Use generated textures instead of image files.
    #[arg(long)]
    pub procedural: bool,

    /// Number of background stars.
    #[arg(long)]
    pub stars: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(preset) = args.preset {
            self.planet = PlanetConfig::from_preset(preset);
        }
        if let Some(res) = args.resolution {
            self.planet.resolution = res;
        }
        if let Some(radius) = args.radius {
            self.planet.radius = radius;
        }
        if let Some(ref path) = args.elevation {
            self.textures.elevation = path.clone();
        }
        if let Some(ref path) = args.color {
            self.textures.color = path.clone();
        }
        if let Some(ref path) = args.bump {
            self.textures.bump = path.clone();
        }
        if args.procedural {
            self.textures.procedural = true;
        }
        if let Some(count) = args.stars {
            self.starfield.count = count;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
