//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Rendering settings.
    pub render: RenderConfig,
    /// Orbit camera input settings.
    pub input: InputConfig,
    /// Planet geometry and surface parameters.
    pub planet: PlanetConfig,
    /// Texture sources for the planet surface.
    pub textures: TextureConfig,
    /// Background starfield.
    pub starfield: StarfieldConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in fullscreen mode.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title.
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Background clear color (linear RGB).
    pub clear_color: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Near clip plane distance.
    pub z_near: f32,
    /// Far clip plane distance.
    pub z_far: f32,
    /// Position the directional light shines from, towards the origin.
    pub light_position: [f32; 3],
    /// Directional light intensity.
    pub light_intensity: f32,
    /// Directional light color (linear RGB).
    pub light_color: [f32; 3],
    /// Ambient light intensity.
    pub ambient_intensity: f32,
    /// Draw the Fresnel rim-glow shell.
    pub glow_enabled: bool,
}

/// Orbit camera input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of orbit per pixel of drag.
    pub rotate_sensitivity: f32,
    /// Zoom factor per scroll line.
    pub zoom_sensitivity: f32,
    /// Fraction of the remaining orbit velocity applied each frame (0 disables damping).
    pub damping_factor: f32,
    /// Invert Y axis for camera drag.
    pub invert_y: bool,
}

/// Named parameter sets for the planet.
///
/// `Standard` is the full-resolution viewer with an aspect-aware camera
/// distance. `Lite` is a cheaper variant with half the tessellation, a fixed
/// camera distance and gentler defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlanetPreset {
    #[default]
    Standard,
    Lite,
}

impl std::str::FromStr for PlanetPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "lite" => Ok(Self::Lite),
            other => Err(format!("unknown preset `{other}` (expected `standard` or `lite`)")),
        }
    }
}

/// How the initial camera distance is chosen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum CameraDistance {
    /// `radius * portrait` when the window is taller than wide, else `radius * landscape`.
    AspectAdaptive { portrait: f32, landscape: f32 },
    /// A fixed distance from the planet center.
    Fixed(f32),
}

impl CameraDistance {
    /// Resolve to a concrete distance for a planet radius and window aspect ratio.
    pub fn resolve(&self, radius: f32, aspect: f32) -> f32 {
        match *self {
            CameraDistance::AspectAdaptive {
                portrait,
                landscape,
            } => {
                if aspect < 1.0 {
                    radius * portrait
                } else {
                    radius * landscape
                }
            }
            CameraDistance::Fixed(distance) => distance,
        }
    }
}

/// Planet geometry and surface parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Base sphere radius in scene units.
    pub radius: f32,
    /// Latitude/longitude subdivisions of the base sphere.
    pub resolution: u32,
    /// Axial tilt about Z in degrees.
    pub axial_tilt_deg: f32,
    /// Radians of spin per frame at rotation speed 1.0.
    pub rotation_scale: f32,
    /// Normalized rotation speed (0-1).
    pub rotation_speed: f32,
    /// Radians per frame that replace the speed-scaled spin when set.
    pub fixed_spin: Option<f32>,
    /// Height exaggeration (0-0.5).
    pub displacement_multiplier: f32,
    /// Bump map strength (0-1).
    pub bump_scale: f32,
    /// Scale of the rim-glow shell relative to the planet.
    pub glow_scale: f32,
    /// Glow color at grazing angles, as 0xRRGGBB.
    pub rim_color: u32,
    /// Glow color facing the camera, as 0xRRGGBB.
    pub facing_color: u32,
    /// Fresnel bias term.
    pub fresnel_bias: f32,
    /// Fresnel scale term.
    pub fresnel_scale: f32,
    /// Fresnel exponent.
    pub fresnel_power: f32,
    /// Initial camera distance policy.
    pub camera_distance: CameraDistance,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            resolution: 512,
            axial_tilt_deg: 25.2,
            rotation_scale: 0.002,
            rotation_speed: 0.1,
            fixed_spin: None,
            displacement_multiplier: 0.05,
            bump_scale: 0.25,
            glow_scale: 1.01,
            rim_color: 0xff0077,
            facing_color: 0x000000,
            fresnel_bias: 0.1,
            fresnel_scale: 1.0,
            fresnel_power: 4.0,
            camera_distance: CameraDistance::AspectAdaptive {
                portrait: 5.0,
                landscape: 3.5,
            },
        }
    }
}

/// Upper bound on `resolution`; 2048 subdivisions is about 4.2 million vertices.
pub const MAX_RESOLUTION: u32 = 2048;

impl PlanetConfig {
    /// Planet settings for a named preset.
    pub fn from_preset(preset: PlanetPreset) -> Self {
        match preset {
            PlanetPreset::Standard => Self::default(),
            PlanetPreset::Lite => Self {
                resolution: 256,
                fixed_spin: Some(0.001),
                displacement_multiplier: 0.04,
                bump_scale: 0.2,
                camera_distance: CameraDistance::Fixed(30.0),
                ..Self::default()
            },
        }
    }

    /// Check the values the mesh builder relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "planet.radius",
                reason: format!("must be positive and finite, got {}", self.radius),
            });
        }
        if self.resolution < 3 {
            return Err(ConfigError::InvalidValue {
                field: "planet.resolution",
                reason: format!("must be at least 3, got {}", self.resolution),
            });
        }
        if self.resolution > MAX_RESOLUTION {
            return Err(ConfigError::InvalidValue {
                field: "planet.resolution",
                reason: format!("must be at most {MAX_RESOLUTION}, got {}", self.resolution),
            });
        }
        if let Some(spin) = self.fixed_spin.filter(|spin| !spin.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "planet.fixed_spin",
                reason: format!("must be finite, got {spin}"),
            });
        }
        if !(self.glow_scale.is_finite() && self.glow_scale > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "planet.glow_scale",
                reason: format!("must be positive and finite, got {}", self.glow_scale),
            });
        }
        Ok(())
    }
}

/// Where the three planet textures come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Elevation map; only the red channel is read.
    pub elevation: PathBuf,
    /// Diffuse color map.
    pub color: PathBuf,
    /// Bump map.
    pub bump: PathBuf,
    /// Generate textures procedurally instead of reading files.
    pub procedural: bool,
    /// Seed for procedural textures.
    pub procedural_seed: u32,
    /// Width of procedural textures in pixels (height is half).
    pub procedural_width: u32,
}

/// Background starfield configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars.
    pub count: u32,
    /// RNG seed.
    pub seed: u64,
    /// Inner radius of the star shell.
    pub min_radius: f32,
    /// Thickness of the star shell.
    pub shell_depth: f32,
    /// Star size in world units; apparent size shrinks with distance.
    pub point_size: f32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show FPS and parameters in the window title.
    pub show_hud: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Directory for JSON logs in debug builds; empty means the platform log dir.
    pub log_dir: PathBuf,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Topo Globe".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0],
            fov_y_deg: 45.0,
            z_near: 1.0,
            z_far: 500.0,
            light_position: [5.0, 10.0, 7.5],
            light_intensity: 1.0,
            light_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.2,
            glow_enabled: true,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 0.1,
            damping_factor: 0.05,
            invert_y: false,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            elevation: PathBuf::from("textures/mars_topo4k.jpg"),
            color: PathBuf::from("textures/mars_color4k.jpg"),
            bump: PathBuf::from("textures/mars_bump4k.jpg"),
            procedural: false,
            procedural_seed: 7,
            procedural_width: 1024,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 3000,
            seed: 42,
            min_radius: 100.0,
            shell_depth: 25.0,
            point_size: 1.5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_hud: true,
            log_level: "info".to_string(),
            log_dir: PathBuf::new(),
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("resolution: 512"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.planet = PlanetConfig::from_preset(PlanetPreset::Lite);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(window: (), render: (), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.planet, PlanetConfig::default());
        assert_eq!(config.starfield, StarfieldConfig::default());
    }

    #[test]
    fn test_partial_planet_section_keeps_other_defaults() {
        let ron_str = "(planet: (radius: 4.0, resolution: 64))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.planet.radius, 4.0);
        assert_eq!(config.planet.resolution, 64);
        assert_eq!(config.planet.bump_scale, 0.25);
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.textures.procedural = true;
        config.planet.displacement_multiplier = 0.3;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.planet.bump_scale = 0.9;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().planet.bump_scale, 0.9);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_lite_preset_values() {
        let lite = PlanetConfig::from_preset(PlanetPreset::Lite);
        assert_eq!(lite.resolution, 256);
        assert_eq!(lite.displacement_multiplier, 0.04);
        assert_eq!(lite.bump_scale, 0.2);
        assert_eq!(lite.camera_distance.resolve(10.0, 1.5), 30.0);
        assert_eq!(lite.radius, 10.0);
        assert_eq!(lite.fixed_spin, Some(0.001));
        assert_eq!(PlanetConfig::default().fixed_spin, None);
    }

    #[test]
    fn test_camera_distance_depends_on_orientation() {
        let policy = PlanetConfig::default().camera_distance;
        assert_eq!(policy.resolve(10.0, 16.0 / 9.0), 35.0);
        assert_eq!(policy.resolve(10.0, 9.0 / 16.0), 50.0);
        // A square window counts as landscape.
        assert_eq!(policy.resolve(10.0, 1.0), 35.0);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Lite".parse::<PlanetPreset>(), Ok(PlanetPreset::Lite));
        assert_eq!("standard".parse::<PlanetPreset>(), Ok(PlanetPreset::Standard));
        assert!("huge".parse::<PlanetPreset>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut planet = PlanetConfig::default();
        assert!(planet.validate().is_ok());

        planet.radius = 0.0;
        assert!(matches!(
            planet.validate(),
            Err(ConfigError::InvalidValue { field: "planet.radius", .. })
        ));

        planet.radius = 10.0;
        planet.resolution = 2;
        assert!(planet.validate().is_err());
    }

    #[test]
    fn test_validate_caps_resolution() {
        let mut planet = PlanetConfig {
            resolution: MAX_RESOLUTION,
            ..PlanetConfig::default()
        };
        assert!(planet.validate().is_ok());

        planet.resolution = 70_000;
        assert!(matches!(
            planet.validate(),
            Err(ConfigError::InvalidValue { field: "planet.resolution", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_fixed_spin() {
        let planet = PlanetConfig {
            fixed_spin: Some(f32::NAN),
            ..PlanetConfig::default()
        };
        assert!(matches!(
            planet.validate(),
            Err(ConfigError::InvalidValue { field: "planet.fixed_spin", .. })
        ));
    }

    #[test]
    fn test_fixed_spin_survives_ron() {
        let ron_str = "(planet: (fixed_spin: Some(0.003)))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.planet.fixed_spin, Some(0.003));
        assert_eq!(config.planet.rotation_speed, 0.1);
    }
}
