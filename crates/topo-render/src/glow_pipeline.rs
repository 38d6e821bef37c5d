//! Fresnel rim glow: an additive shell drawn from the planet's own mesh,
//! scaled slightly outward.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::{DepthBuffer, MeshBuffer, PlanetVertex};

pub const GLOW_SHADER_SOURCE: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

struct Glow {
    model: mat4x4<f32>,
    // rgb: rim color, w: fresnel bias
    rim: vec4<f32>,
    // rgb: facing color, w: fresnel scale
    facing: vec4<f32>,
    // x: fresnel power
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> glow: Glow;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) reflection: f32,
};

@vertex
fn vs_glow(in: VertexInput) -> VertexOutput {
    let world = glow.model * vec4<f32>(in.position, 1.0);
    let n = (glow.model * vec4<f32>(in.normal, 0.0)).xyz;
    var factor = 0.0;
    if dot(n, n) > 0.0 {
        let incident = normalize(world.xyz - camera.camera_pos.xyz);
        let cos_i = clamp(1.0 + dot(incident, normalize(n)), 0.0, 1.0);
        factor = glow.rim.w + glow.facing.w * pow(cos_i, glow.params.x);
    }
    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.reflection = factor;
    return out;
}

@fragment
fn fs_glow(in: VertexOutput) -> @location(0) vec4<f32> {
    let t = clamp(in.reflection, 0.0, 1.0);
    return vec4<f32>(mix(glow.facing.rgb, glow.rim.rgb, t), 1.0);
}
"#;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlowUniform {
    pub model: [[f32; 4]; 4],
    pub rim: [f32; 4],
    pub facing: [f32; 4],
    pub params: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<GlowUniform>() % 16, 0);

impl GlowUniform {
    /// `rim` and `facing` are linear RGB; `bias`, `scale` and `power` shape
    /// `bias + scale * (1 + I.N)^power`.
    pub fn new(
        model: Mat4,
        rim: [f32; 3],
        facing: [f32; 3],
        bias: f32,
        scale: f32,
        power: f32,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            rim: [rim[0], rim[1], rim[2], bias],
            facing: [facing[0], facing[1], facing[2], scale],
            params: [power, 0.0, 0.0, 0.0],
        }
    }

    /// CPU mirror of the per-vertex reflection factor, before clamping.
    pub fn reflection_factor(&self, cos_incident: f32) -> f32 {
        let base = (1.0 + cos_incident).clamp(0.0, 1.0);
        self.rim[3] + self.facing[3] * base.powf(self.params[0])
    }
}

pub struct GlowPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub glow_bind_group_layout: wgpu::BindGroupLayout,
}

impl GlowPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glow-shader"),
            source: wgpu::ShaderSource::Wgsl(GLOW_SHADER_SOURCE.into()),
        });

        let glow_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("glow-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: std::num::NonZeroU64::new(
                            std::mem::size_of::<GlowUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("glow-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &glow_bind_group_layout],
            immediate_size: 0,
        });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("glow-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_glow"),
                buffers: &[PlanetVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::overlay_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_glow"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState {
                        color: additive,
                        alpha: additive,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            glow_bind_group_layout,
        }
    }
}

/// Draws the glow shell over whatever [`MeshBuffer`] the planet currently uses.
pub struct GlowRenderer {
    pub pipeline: GlowPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GlowRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let pipeline = GlowPipeline::new(device, surface_format, camera_layout);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glow-uniform"),
            contents: bytemuck::bytes_of(&GlowUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glow-bg"),
            layout: &pipeline.glow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &GlowUniform) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }

    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        mesh: &'a MeshBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        mesh.bind(render_pass);
        mesh.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CameraBinding;
    use crate::gpu::create_test_device_queue;

    fn default_glow() -> GlowUniform {
        GlowUniform::new(Mat4::IDENTITY, [1.0, 0.0, 0.18], [0.0; 3], 0.1, 1.0, 4.0)
    }

    #[test]
    fn test_facing_the_camera_gives_bias_only() {
        // Incident ray antiparallel to the normal.
        let glow = default_glow();
        assert!((glow.reflection_factor(-1.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_grazing_angle_saturates() {
        let glow = default_glow();
        assert!((glow.reflection_factor(0.0) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_reflection_grows_towards_the_rim() {
        let glow = default_glow();
        let mut previous = glow.reflection_factor(-1.0);
        for i in 1..=10 {
            let cos_i = -1.0 + i as f32 / 10.0;
            let factor = glow.reflection_factor(cos_i);
            assert!(factor > previous);
            previous = factor;
        }
    }

    #[test]
    fn test_uniform_packing() {
        let glow = default_glow();
        assert_eq!(glow.rim, [1.0, 0.0, 0.18, 0.1]);
        assert_eq!(glow.facing, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(glow.params[0], 4.0);
    }

    #[test]
    fn test_renderer_creation() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let camera = CameraBinding::new(&device);
        let renderer = GlowRenderer::new(&device, wgpu::TextureFormat::Bgra8UnormSrgb, &camera.layout);
        assert_eq!(
            renderer.uniform_buffer.size(),
            std::mem::size_of::<GlowUniform>() as u64
        );
    }
}
