//! Interactive planet parameters and the rebuilds they trigger.
//!
//! The controller has a single idle state. Every geometry parameter change
//! runs one synchronous, full rebuild before returning. If textures are still
//! loading, the rebuild is deferred and runs once when they are ready.

use std::fmt;
use std::ops::RangeInclusive;

use topo_config::PlanetConfig;
use topo_terrain::{DisplacementParams, DisplacementReport};
use tracing::{debug, info};

use crate::{PlanetAssets, PlanetBuild, PlanetError, PlanetShape, PlanetTransform};

/// Frame length the per-frame rotation scale is defined against.
const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

/// A user-adjustable planet parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parameter {
    RotationSpeed,
    DisplacementMultiplier,
    BumpScale,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [
        Parameter::RotationSpeed,
        Parameter::DisplacementMultiplier,
        Parameter::BumpScale,
    ];

    /// Allowed values, matching the slider ranges.
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            Parameter::RotationSpeed => 0.0..=1.0,
            Parameter::DisplacementMultiplier => 0.0..=0.5,
            Parameter::BumpScale => 0.0..=1.0,
        }
    }

    /// Increment used by keyboard nudges.
    pub fn step(self) -> f32 {
        match self {
            Parameter::RotationSpeed => 0.05,
            Parameter::DisplacementMultiplier => 0.01,
            Parameter::BumpScale => 0.05,
        }
    }

    /// Whether changing this parameter requires new geometry.
    pub fn rebuilds_geometry(self) -> bool {
        !matches!(self, Parameter::RotationSpeed)
    }

    pub fn clamp(self, value: f32) -> f32 {
        let range = self.range();
        if value.is_nan() {
            *range.start()
        } else {
            value.clamp(*range.start(), *range.end())
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parameter::RotationSpeed => "Rotation Speed",
            Parameter::DisplacementMultiplier => "Displacement Multiplier",
            Parameter::BumpScale => "Bump Scale",
        })
    }
}

/// Current values of the adjustable parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetParameters {
    /// Normalized spin speed (0-1).
    pub rotation_speed: f32,
    pub displacement_multiplier: f32,
    pub bump_scale: f32,
}

impl PlanetParameters {
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            rotation_speed: Parameter::RotationSpeed.clamp(config.rotation_speed),
            displacement_multiplier: Parameter::DisplacementMultiplier
                .clamp(config.displacement_multiplier),
            bump_scale: Parameter::BumpScale.clamp(config.bump_scale),
        }
    }

    pub fn get(&self, parameter: Parameter) -> f32 {
        match parameter {
            Parameter::RotationSpeed => self.rotation_speed,
            Parameter::DisplacementMultiplier => self.displacement_multiplier,
            Parameter::BumpScale => self.bump_scale,
        }
    }

    fn set(&mut self, parameter: Parameter, value: f32) {
        let slot = match parameter {
            Parameter::RotationSpeed => &mut self.rotation_speed,
            Parameter::DisplacementMultiplier => &mut self.displacement_multiplier,
            Parameter::BumpScale => &mut self.bump_scale,
        };
        *slot = value;
    }
}

impl Default for PlanetParameters {
    fn default() -> Self {
        Self::from_config(&PlanetConfig::default())
    }
}

/// What a parameter change or rebuild request did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RebuildOutcome {
    /// A new planet was built.
    Rebuilt(DisplacementReport),
    /// Textures are not loaded yet; the rebuild will run once they are.
    Deferred,
    /// Nothing geometric changed.
    Unchanged,
}

/// Owns the planet parameters, the current build and the spin state.
pub struct ParameterController {
    shape: PlanetShape,
    defaults: PlanetParameters,
    params: PlanetParameters,
    rotation_scale: f32,
    fixed_spin: Option<f32>,
    transform: PlanetTransform,
    build: Option<PlanetBuild>,
    rebuild_pending: bool,
}

impl ParameterController {
    /// A controller with no build yet. The first build runs as soon as
    /// [`ParameterController::on_assets_ready`] or a rebuild finds the
    /// textures loaded.
    pub fn new(config: &PlanetConfig) -> Self {
        let shape = PlanetShape::from_config(config);
        let defaults = PlanetParameters::from_config(config);
        Self {
            transform: PlanetTransform::new(shape.axial_tilt),
            shape,
            defaults,
            params: defaults,
            rotation_scale: config.rotation_scale,
            fixed_spin: config.fixed_spin,
            build: None,
            rebuild_pending: true,
        }
    }

    pub fn params(&self) -> &PlanetParameters {
        &self.params
    }

    pub fn defaults(&self) -> &PlanetParameters {
        &self.defaults
    }

    pub fn shape(&self) -> &PlanetShape {
        &self.shape
    }

    /// The current planet, if one has been built.
    pub fn build(&self) -> Option<&PlanetBuild> {
        self.build.as_ref()
    }

    pub fn build_mut(&mut self) -> Option<&mut PlanetBuild> {
        self.build.as_mut()
    }

    pub fn transform(&self) -> &PlanetTransform {
        &self.transform
    }

    /// Whether a rebuild is waiting for textures.
    pub fn is_rebuild_pending(&self) -> bool {
        self.rebuild_pending
    }

    /// Displacement inputs for the current parameters.
    pub fn displacement_params(&self) -> DisplacementParams {
        DisplacementParams {
            radius: self.shape.radius,
            displacement_multiplier: self.params.displacement_multiplier,
            bump_scale: self.params.bump_scale,
        }
    }

    /// Set a parameter (clamped to its range) and rebuild if it affects geometry.
    pub fn on_parameter_change(
        &mut self,
        parameter: Parameter,
        value: f32,
        assets: &PlanetAssets,
    ) -> Result<RebuildOutcome, PlanetError> {
        let value = parameter.clamp(value);
        let previous = self.params.get(parameter);
        self.params.set(parameter, value);
        debug!(%parameter, previous, value, "parameter changed");

        if parameter.rebuilds_geometry() {
            self.rebuild(assets)
        } else {
            Ok(RebuildOutcome::Unchanged)
        }
    }

    /// Move a parameter by `steps` increments.
    pub fn nudge(
        &mut self,
        parameter: Parameter,
        steps: i32,
        assets: &PlanetAssets,
    ) -> Result<RebuildOutcome, PlanetError> {
        let value = self.params.get(parameter) + steps as f32 * parameter.step();
        self.on_parameter_change(parameter, value, assets)
    }

    /// Restore every parameter to its default and rebuild once.
    pub fn reset(&mut self, assets: &PlanetAssets) -> Result<RebuildOutcome, PlanetError> {
        self.params = self.defaults;
        info!("planet parameters reset to defaults");
        self.rebuild(assets)
    }

    /// Discard the current planet and build a new one from the current parameters.
    pub fn rebuild(&mut self, assets: &PlanetAssets) -> Result<RebuildOutcome, PlanetError> {
        if !assets.is_ready() {
            self.rebuild_pending = true;
            debug!(missing = ?assets.next_missing(), "rebuild deferred until textures load");
            return Ok(RebuildOutcome::Deferred);
        }

        self.build = None;
        let build = PlanetBuild::from_assets(&self.shape, assets, self.displacement_params())?;
        let report = build.report;
        self.build = Some(build);
        self.rebuild_pending = false;
        Ok(RebuildOutcome::Rebuilt(report))
    }

    /// Run a deferred rebuild, if any, now that textures are loaded.
    pub fn on_assets_ready(&mut self, assets: &PlanetAssets) -> Result<RebuildOutcome, PlanetError> {
        if self.rebuild_pending {
            self.rebuild(assets)
        } else {
            Ok(RebuildOutcome::Unchanged)
        }
    }

    /// Spin for a frame of `dt` seconds; returns the angle added.
    ///
    /// `rotation_speed * rotation_scale` radians per 1/60 s, scaled by `dt`.
    /// A configured fixed spin replaces the speed-scaled rate.
    pub fn advance_rotation(&mut self, dt: f32) -> f32 {
        let per_frame = self
            .fixed_spin
            .unwrap_or(self.params.rotation_speed * self.rotation_scale);
        let angle = per_frame * (dt / REFERENCE_FRAME_SECS);
        self.transform.rotate(angle);
        angle
    }

    /// One-line description of the parameters, for the HUD.
    pub fn summary(&self) -> String {
        format!(
            "rot {:.2} | disp {:.3} | bump {:.2}",
            self.params.rotation_speed, self.params.displacement_multiplier, self.params.bump_scale
        )
    }
}

#[cfg(test)]
mod tests {
    use topo_terrain::Heightmap;

    use super::*;
    use crate::{TextureSet, TextureSource};

    fn small_config() -> PlanetConfig {
        PlanetConfig {
            resolution: 8,
            ..PlanetConfig::default()
        }
    }

    fn ready_assets(value: u8) -> PlanetAssets {
        PlanetAssets::from_set(TextureSet {
            elevation: Heightmap::uniform(16, 8, value),
            color: image::RgbaImage::new(2, 2),
            bump: image::RgbaImage::new(2, 2),
        })
    }

    fn loading_assets() -> PlanetAssets {
        PlanetAssets::new(TextureSource::Procedural { seed: 9, width: 16 })
    }

    #[test]
    fn test_defaults() {
        let controller = ParameterController::new(&small_config());
        let p = controller.params();
        assert_eq!(p.rotation_speed, 0.1);
        assert_eq!(p.displacement_multiplier, 0.05);
        assert_eq!(p.bump_scale, 0.25);
        assert!(controller.build().is_none());
        assert!(controller.is_rebuild_pending());
    }

    #[test]
    fn test_geometry_change_rebuilds() {
        let assets = ready_assets(255);
        let mut controller = ParameterController::new(&small_config());

        let outcome = controller
            .on_parameter_change(Parameter::DisplacementMultiplier, 0.2, &assets)
            .unwrap();

        let RebuildOutcome::Rebuilt(report) = outcome else {
            panic!("expected rebuild, got {outcome:?}");
        };
        assert!((report.max_radius - 12.0).abs() < 1e-5);
        assert_eq!(controller.build().unwrap().params.displacement_multiplier, 0.2);
    }

    #[test]
    fn test_bump_change_rebuilds_with_new_material() {
        let assets = ready_assets(0);
        let mut controller = ParameterController::new(&small_config());
        controller
            .on_parameter_change(Parameter::BumpScale, 0.8, &assets)
            .unwrap();
        assert_eq!(controller.build().unwrap().material.bump_scale, 0.8);
    }

    #[test]
    fn test_rotation_speed_does_not_rebuild() {
        let assets = ready_assets(0);
        let mut controller = ParameterController::new(&small_config());
        controller.rebuild(&assets).unwrap();

        let outcome = controller
            .on_parameter_change(Parameter::RotationSpeed, 0.7, &assets)
            .unwrap();
        assert_eq!(outcome, RebuildOutcome::Unchanged);
        assert_eq!(controller.params().rotation_speed, 0.7);
    }

    #[test]
    fn test_values_clamped_to_slider_range() {
        let assets = ready_assets(0);
        let mut controller = ParameterController::new(&small_config());
        controller
            .on_parameter_change(Parameter::DisplacementMultiplier, 3.0, &assets)
            .unwrap();
        controller
            .on_parameter_change(Parameter::BumpScale, -1.0, &assets)
            .unwrap();
        controller
            .on_parameter_change(Parameter::RotationSpeed, f32::NAN, &assets)
            .unwrap();
        assert_eq!(controller.params().displacement_multiplier, 0.5);
        assert_eq!(controller.params().bump_scale, 0.0);
        assert_eq!(controller.params().rotation_speed, 0.0);
    }

    #[test]
    fn test_reset_restores_defaults_and_rebuilds() {
        let assets = ready_assets(255);
        let mut controller = ParameterController::new(&small_config());
        controller
            .on_parameter_change(Parameter::DisplacementMultiplier, 0.4, &assets)
            .unwrap();
        controller
            .on_parameter_change(Parameter::RotationSpeed, 1.0, &assets)
            .unwrap();

        let outcome = controller.reset(&assets).unwrap();

        assert!(matches!(outcome, RebuildOutcome::Rebuilt(_)));
        assert_eq!(*controller.params(), PlanetParameters::default());
        let build = controller.build().unwrap();
        assert!((build.report.max_radius - 10.5).abs() < 1e-5);
    }

    #[test]
    fn test_change_while_loading_is_deferred() {
        let mut assets = loading_assets();
        let mut controller = ParameterController::new(&small_config());

        let outcome = controller
            .on_parameter_change(Parameter::DisplacementMultiplier, 0.3, &assets)
            .unwrap();
        assert_eq!(outcome, RebuildOutcome::Deferred);
        assert!(controller.build().is_none());
        assert_eq!(controller.params().displacement_multiplier, 0.3);

        assets.poll().unwrap();
        assert_eq!(controller.rebuild(&assets).unwrap(), RebuildOutcome::Deferred);

        assets.load_all().unwrap();
        let outcome = controller.on_assets_ready(&assets).unwrap();
        assert!(matches!(outcome, RebuildOutcome::Rebuilt(_)));
        assert_eq!(controller.build().unwrap().params.displacement_multiplier, 0.3);
        assert!(!controller.is_rebuild_pending());

        // Nothing left to do on a second notification.
        assert_eq!(controller.on_assets_ready(&assets).unwrap(), RebuildOutcome::Unchanged);
    }

    #[test]
    fn test_nudge_steps_and_clamps() {
        let assets = ready_assets(0);
        let mut controller = ParameterController::new(&small_config());
        controller.nudge(Parameter::BumpScale, 2, &assets).unwrap();
        assert!((controller.params().bump_scale - 0.35).abs() < 1e-6);
        controller
            .nudge(Parameter::DisplacementMultiplier, -100, &assets)
            .unwrap();
        assert_eq!(controller.params().displacement_multiplier, 0.0);
    }

    #[test]
    fn test_advance_rotation_is_frame_rate_independent() {
        let mut a = ParameterController::new(&small_config());
        let mut b = ParameterController::new(&small_config());

        let step = a.advance_rotation(1.0 / 60.0);
        assert!((step - 0.1 * 0.002).abs() < 1e-9);

        for _ in 0..60 {
            a.advance_rotation(1.0 / 60.0);
        }
        for _ in 0..30 {
            b.advance_rotation(1.0 / 30.0);
        }
        let expected = 61.0 * 0.1 * 0.002;
        assert!((a.transform().spin - expected).abs() < 1e-5);
        assert!((b.transform().spin - 60.0 * 0.1 * 0.002).abs() < 1e-5);
    }

    #[test]
    fn test_zero_speed_does_not_spin() {
        let assets = ready_assets(0);
        let mut controller = ParameterController::new(&small_config());
        controller
            .on_parameter_change(Parameter::RotationSpeed, 0.0, &assets)
            .unwrap();
        assert_eq!(controller.advance_rotation(0.5), 0.0);
        assert_eq!(controller.transform().spin, 0.0);
    }

    #[test]
    fn test_lite_preset_defaults() {
        let config = PlanetConfig::from_preset(topo_config::PlanetPreset::Lite);
        let controller = ParameterController::new(&config);
        assert_eq!(controller.params().displacement_multiplier, 0.04);
        assert_eq!(controller.params().bump_scale, 0.2);
        assert_eq!(controller.shape().resolution, 256);
    }

    #[test]
    fn test_lite_preset_spins_at_fixed_rate() {
        let assets = ready_assets(0);
        let config = PlanetConfig::from_preset(topo_config::PlanetPreset::Lite);
        let mut controller = ParameterController::new(&config);

        let step = controller.advance_rotation(1.0 / 60.0);
        assert!((step - 0.001).abs() < 1e-7, "lite step was {step}");

        // The speed parameter does not change a fixed spin.
        controller
            .on_parameter_change(Parameter::RotationSpeed, 1.0, &assets)
            .unwrap();
        let step = controller.advance_rotation(1.0 / 60.0);
        assert!((step - 0.001).abs() < 1e-7);
        assert!((controller.advance_rotation(1.0 / 30.0) - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_parameter_labels() {
        assert_eq!(Parameter::BumpScale.to_string(), "Bump Scale");
        assert!(Parameter::ALL.iter().all(|p| p.range().contains(&p.step())));
    }

    #[test]
    fn test_summary() {
        let controller = ParameterController::new(&small_config());
        assert_eq!(controller.summary(), "rot 0.10 | disp 0.050 | bump 0.25");
    }
}
