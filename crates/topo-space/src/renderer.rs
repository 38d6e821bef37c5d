//! Additive, distance-attenuated star billboards.

use bytemuck::{Pod, Zeroable};
use topo_render::DepthBuffer;
use wgpu::util::DeviceExt;

use crate::Star;

/// Each star is an instanced quad expanded in clip space. Apparent size is
/// `size / view_depth` in NDC, so a star shrinks with distance the way a
/// world-sized sprite would.
pub const STARFIELD_SHADER_SOURCE: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

struct Stars {
    // x: star size in world units
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> stars: Stars;

struct StarInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) corner: vec2<f32>,
    @location(1) color: vec3<f32>,
};

@vertex
fn vs_star(@builtin(vertex_index) idx: u32, star: StarInput) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[idx];
    var clip = camera.view_proj * vec4<f32>(star.position, 1.0);
    let aspect_fix = camera.viewport.y / max(camera.viewport.x, 1.0);
    let half_size = 0.5 * stars.params.x;
    clip = vec4<f32>(clip.xy + corner * half_size * vec2<f32>(aspect_fix, 1.0), clip.zw);

    var out: VertexOutput;
    out.clip_position = clip;
    out.corner = corner;
    out.color = star.color;
    return out;
}

@fragment
fn fs_star(in: VertexOutput) -> @location(0) vec4<f32> {
    let r2 = dot(in.corner, in.corner);
    if r2 > 1.0 {
        discard;
    }
    let falloff = 1.0 - r2;
    return vec4<f32>(in.color * falloff, 1.0);
}
"#;

/// Per-instance star data.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl StarInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&Star> for StarInstance {
    fn from(star: &Star) -> Self {
        Self {
            position: star.position.to_array(),
            color: star.color,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct StarsUniform {
    params: [f32; 4],
}

pub struct StarfieldRenderer {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: Option<wgpu::Buffer>,
    instance_count: u32,
    bind_group: wgpu::BindGroup,
}

impl StarfieldRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        stars: &[Star],
        size: f32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfield-shader"),
            source: wgpu::ShaderSource::Wgsl(STARFIELD_SHADER_SOURCE.into()),
        });

        let stars_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("starfield-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("starfield-uniform"),
            contents: bytemuck::bytes_of(&StarsUniform {
                params: [size, 0.0, 0.0, 0.0],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("starfield-bg"),
            layout: &stars_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("starfield-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &stars_layout],
            immediate_size: 0,
        });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("starfield-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_star"),
                buffers: &[StarInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::overlay_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_star"),
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

        let instances: Vec<StarInstance> = stars.iter().map(StarInstance::from).collect();
        // A zero-sized vertex buffer is invalid, so an empty sky draws nothing.
        let instance_buffer = (!instances.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("starfield-instances"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        log::info!("Starfield ready: {} stars", instances.len());

        Self {
            pipeline,
            instance_buffer,
            instance_count: instances.len() as u32,
            bind_group,
        }
    }

    pub fn star_count(&self) -> u32 {
        self.instance_count
    }

    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        let Some(instances) = &self.instance_buffer else {
            return;
        };
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, instances.slice(..));
        render_pass.draw(0..6, 0..self.instance_count);
    }
}
