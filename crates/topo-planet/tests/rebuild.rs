//! End-to-end planet builds from config through procedural textures.

use glam::Vec3;
use topo_config::{PlanetConfig, TextureConfig};
use topo_planet::{
    Parameter, ParameterController, PlanetAssets, RebuildOutcome, TextureSource,
};

fn config() -> PlanetConfig {
    PlanetConfig {
        resolution: 24,
        ..PlanetConfig::default()
    }
}

fn procedural_assets() -> PlanetAssets {
    let textures = TextureConfig {
        procedural: true,
        procedural_width: 128,
        ..TextureConfig::default()
    };
    let mut assets = PlanetAssets::new(TextureSource::from_config(&textures));
    assets.load_all().unwrap();
    assets
}

fn radii(controller: &ParameterController) -> Vec<f32> {
    controller
        .build()
        .unwrap()
        .mesh
        .positions()
        .iter()
        .map(|p| Vec3::from_array(*p).length())
        .collect()
}

#[test]
fn displaced_radii_stay_within_multiplier_band() {
    let assets = procedural_assets();
    let mut controller = ParameterController::new(&config());
    controller.rebuild(&assets).unwrap();

    let m = controller.params().displacement_multiplier;
    for r in radii(&controller) {
        assert!(r >= 10.0 - 1e-4 && r <= 10.0 * (1.0 + m) + 1e-4, "radius {r}");
    }
}

#[test]
fn identical_controllers_build_identical_planets() {
    let assets = procedural_assets();
    let mut a = ParameterController::new(&config());
    let mut b = ParameterController::new(&config());
    a.rebuild(&assets).unwrap();
    b.rebuild(&assets).unwrap();

    let (pa, pb) = (a.build().unwrap(), b.build().unwrap());
    assert_eq!(pa.mesh.positions(), pb.mesh.positions());
    assert_eq!(pa.mesh.normals(), pb.mesh.normals());
}

#[test]
fn larger_multiplier_lifts_every_raised_vertex() {
    let assets = procedural_assets();
    let mut controller = ParameterController::new(&config());
    controller.rebuild(&assets).unwrap();
    let low = radii(&controller);

    let outcome = controller
        .on_parameter_change(Parameter::DisplacementMultiplier, 0.3, &assets)
        .unwrap();
    assert!(matches!(outcome, RebuildOutcome::Rebuilt(_)));
    let high = radii(&controller);

    assert_eq!(low.len(), high.len());
    for (l, h) in low.iter().zip(&high) {
        assert!(h >= l, "vertex sank from {l} to {h}");
    }
}

#[test]
fn reset_after_changes_matches_fresh_build() {
    let assets = procedural_assets();
    let mut fresh = ParameterController::new(&config());
    fresh.rebuild(&assets).unwrap();

    let mut edited = ParameterController::new(&config());
    edited
        .on_parameter_change(Parameter::DisplacementMultiplier, 0.45, &assets)
        .unwrap();
    edited
        .on_parameter_change(Parameter::BumpScale, 0.9, &assets)
        .unwrap();
    edited.reset(&assets).unwrap();

    assert_eq!(
        fresh.build().unwrap().mesh.positions(),
        edited.build().unwrap().mesh.positions()
    );
    assert_eq!(edited.build().unwrap().material.bump_scale, 0.25);
}
