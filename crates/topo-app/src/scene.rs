//! GPU side of the scene: stars, planet and glow sharing one camera binding
//! and one depth buffer.

use topo_config::Config;
use topo_planet::{ParameterController, PlanetAssets};
use topo_render::{
    Camera, CameraBinding, DepthBuffer, FrameEncoder, GlowRenderer, GlowUniform, PlanetLighting,
    PlanetRenderer, RenderContext, RenderPassBuilder, SurfaceError, TextureError,
};
use topo_space::{StarfieldGenerator, StarfieldRenderer};
use tracing::info;

pub struct SceneRenderer {
    depth: DepthBuffer,
    camera_binding: CameraBinding,
    stars: StarfieldRenderer,
    glow: GlowRenderer,
    /// Created once the planet's textures and first build exist.
    planet: Option<PlanetRenderer>,
    lighting: PlanetLighting,
    clear_color: [f32; 3],
    glow_enabled: bool,
}

impl SceneRenderer {
    pub fn new(gpu: &RenderContext, config: &Config) -> Self {
        let (width, height) = gpu.size();
        let depth = DepthBuffer::new(&gpu.device, width, height);
        let camera_binding = CameraBinding::new(&gpu.device);

        let catalog = StarfieldGenerator::from_config(&config.starfield).generate();
        let stars = StarfieldRenderer::new(
            &gpu.device,
            gpu.surface_format,
            &camera_binding.layout,
            &catalog,
            config.starfield.point_size,
        );
        let glow = GlowRenderer::new(&gpu.device, gpu.surface_format, &camera_binding.layout);

        Self {
            depth,
            camera_binding,
            stars,
            glow,
            planet: None,
            lighting: PlanetLighting::from_config(&config.render),
            clear_color: config.render.clear_color,
            glow_enabled: config.render.glow_enabled,
        }
    }

    pub fn resize(&mut self, gpu: &RenderContext, width: u32, height: u32) {
        self.depth.resize(&gpu.device, width, height);
    }

    /// Create the planet renderer on the first build and upload rebuilt
    /// geometry afterwards.
    pub fn sync_planet(
        &mut self,
        gpu: &RenderContext,
        controller: &mut ParameterController,
        assets: &PlanetAssets,
    ) -> Result<(), TextureError> {
        let Some(build) = controller.build_mut() else {
            return Ok(());
        };

        match &mut self.planet {
            Some(renderer) => {
                if renderer.sync_mesh(&gpu.device, &gpu.queue, &mut build.mesh) {
                    info!(vertices = renderer.mesh.vertex_count, "uploaded rebuilt planet mesh");
                }
            }
            None => {
                let Some(textures) = assets.textures() else {
                    return Ok(());
                };
                let renderer = PlanetRenderer::new(
                    &gpu.device,
                    &gpu.queue,
                    gpu.surface_format,
                    &self.camera_binding.layout,
                    &mut build.mesh,
                    &textures.color,
                    &textures.bump,
                )?;
                info!(
                    vertices = renderer.mesh.vertex_count,
                    triangles = renderer.mesh.index_count / 3,
                    "planet renderer ready"
                );
                self.planet = Some(renderer);
            }
        }
        Ok(())
    }

    /// Draw one frame: stars first, then the planet, then the additive glow.
    pub fn render(
        &self,
        gpu: &RenderContext,
        camera: &Camera,
        controller: &ParameterController,
    ) -> Result<(), SurfaceError> {
        self.camera_binding
            .update(&gpu.queue, &camera.to_uniform(gpu.size()));

        let planet = match (&self.planet, controller.build()) {
            (Some(renderer), Some(build)) => {
                let model = controller.transform().model_matrix();
                renderer.update(&gpu.queue, model, &self.lighting, build.material.bump_scale);
                if self.glow_enabled {
                    let g = &build.glow;
                    self.glow.update(
                        &gpu.queue,
                        &GlowUniform::new(
                            build.glow_model(model),
                            g.rim_color,
                            g.facing_color,
                            g.bias,
                            g.fresnel_scale,
                            g.power,
                        ),
                    );
                }
                Some(renderer)
            }
            _ => None,
        };

        let surface_texture = gpu.get_current_texture()?;
        let mut frame = FrameEncoder::new(&gpu.device, &gpu.queue, surface_texture);
        let builder = RenderPassBuilder::new()
            .clear_rgb(self.clear_color)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("scene-pass");

        {
            let mut pass = frame.begin_render_pass(&builder);
            let camera_bg = &self.camera_binding.bind_group;
            self.stars.render(&mut pass, camera_bg);
            if let Some(renderer) = planet {
                renderer.render(&mut pass, camera_bg);
                if self.glow_enabled {
                    self.glow.render(&mut pass, camera_bg, &renderer.mesh);
                }
            }
        }

        frame.submit();
        Ok(())
    }
}
