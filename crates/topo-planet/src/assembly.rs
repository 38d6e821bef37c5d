//! Building a displaced planet from a shape, textures and parameters.

use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use topo_config::{PlanetConfig, hex_to_linear};
use topo_terrain::{DisplacementParams, DisplacementReport, SphereMesh, displace};
use tracing::error;

use crate::{PlanetAssets, PlanetError, TextureKind, TextureSet};

/// Construction-time geometry and look of the planet.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetShape {
    pub radius: f32,
    pub resolution: u32,
    /// Tilt about Z in radians.
    pub axial_tilt: f32,
    pub glow: GlowSettings,
}

impl PlanetShape {
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            radius: config.radius,
            resolution: config.resolution,
            axial_tilt: config.axial_tilt_deg.to_radians(),
            glow: GlowSettings::from_config(config),
        }
    }
}

/// Fresnel rim-glow shell drawn over the planet with the same geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowSettings {
    /// Uniform scale of the shell relative to the planet.
    pub scale: f32,
    /// Linear RGB at grazing angles.
    pub rim_color: [f32; 3],
    /// Linear RGB facing the viewer.
    pub facing_color: [f32; 3],
    pub bias: f32,
    pub fresnel_scale: f32,
    pub power: f32,
}

impl GlowSettings {
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            scale: config.glow_scale,
            rim_color: hex_to_linear(config.rim_color),
            facing_color: hex_to_linear(config.facing_color),
            bias: config.fresnel_bias,
            fresnel_scale: config.fresnel_scale,
            power: config.fresnel_power,
        }
    }
}

/// Surface shading inputs besides the textures themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceMaterial {
    pub bump_scale: f32,
}

/// One complete planet: displaced mesh, surface material and glow shell.
///
/// Replaced as a whole on every rebuild.
#[derive(Clone, Debug)]
pub struct PlanetBuild {
    pub mesh: SphereMesh,
    pub material: SurfaceMaterial,
    pub glow: GlowSettings,
    pub params: DisplacementParams,
    pub report: DisplacementReport,
}

impl PlanetBuild {
    /// Build a fresh base sphere and displace it with `textures.elevation`.
    pub fn new(
        shape: &PlanetShape,
        textures: &TextureSet,
        params: DisplacementParams,
    ) -> Result<Self, PlanetError> {
        let mut mesh = SphereMesh::uv_sphere(shape.radius, shape.resolution)?;
        let report = displace(&mut mesh, &textures.elevation, &params)?;
        Ok(Self {
            mesh,
            material: SurfaceMaterial {
                bump_scale: params.bump_scale,
            },
            glow: shape.glow,
            params,
            report,
        })
    }

    /// Build from loaded assets.
    ///
    /// Callers must wait for [`PlanetAssets::is_ready`]; building earlier is
    /// a sequencing bug. Debug builds panic, release builds log and return
    /// [`PlanetError::AssetNotReady`] without touching anything.
    pub fn from_assets(
        shape: &PlanetShape,
        assets: &PlanetAssets,
        params: DisplacementParams,
    ) -> Result<Self, PlanetError> {
        let Some(textures) = assets.textures() else {
            let missing = assets.next_missing().unwrap_or(TextureKind::Elevation);
            if cfg!(debug_assertions) {
                panic!("planet build requested before the {missing} map loaded");
            }
            error!(%missing, "planet build requested before textures loaded");
            return Err(PlanetError::AssetNotReady { missing });
        };
        Self::new(shape, textures, params)
    }

    /// Model matrix for the glow shell, given the planet's model matrix.
    pub fn glow_model(&self, planet_model: Mat4) -> Mat4 {
        planet_model * Mat4::from_scale(Vec3::splat(self.glow.scale))
    }
}

/// Orientation of the planet group: a fixed axial tilt and an accumulated spin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetTransform {
    pub axial_tilt: f32,
    /// Spin about the tilted Y axis, kept in \[0, 2π).
    pub spin: f32,
}

impl PlanetTransform {
    pub fn new(axial_tilt: f32) -> Self {
        Self {
            axial_tilt,
            spin: 0.0,
        }
    }

    /// Add `angle` radians of spin.
    pub fn rotate(&mut self, angle: f32) {
        self.spin = (self.spin + angle).rem_euclid(TAU);
    }

    /// Tilt applied after spin, so the spin axis is the tilted pole.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_z(self.axial_tilt) * Mat4::from_rotation_y(self.spin)
    }
}
