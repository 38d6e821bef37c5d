//! Background starfield: deterministic star placement in a spherical shell
//! and an additive billboard renderer.

pub mod renderer;
pub mod starfield;

pub use renderer::{STARFIELD_SHADER_SOURCE, StarInstance, StarfieldRenderer};
pub use starfield::{Star, StarfieldGenerator, hsl_to_rgb};
