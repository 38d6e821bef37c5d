//! wgpu rendering for the globe: device and surface management, reverse-Z
//! depth, cameras, and the planet and rim-glow pipelines.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod glow_pipeline;
pub mod gpu;
pub mod orbit_camera;
pub mod pass;
pub mod planet_pipeline;
pub mod texture;

pub use buffer::{MeshBuffer, PlanetVertex, planet_vertices};
pub use camera::{Camera, CameraBinding, CameraUniform};
pub use depth::DepthBuffer;
pub use glow_pipeline::{GLOW_SHADER_SOURCE, GlowPipeline, GlowRenderer, GlowUniform};
pub use gpu::{
    RenderContext, RenderContextError, SurfaceError, init_render_context_blocking,
    unsupported_context_message,
};
pub use orbit_camera::OrbitCamera;
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use planet_pipeline::{
    PLANET_SHADER_SOURCE, PlanetLighting, PlanetPipeline, PlanetRenderer, PlanetUniform,
};
pub use texture::{GpuTexture, TextureError, create_surface_sampler, mip_level_count};
