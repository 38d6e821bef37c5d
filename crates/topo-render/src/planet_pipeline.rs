//! Textured, bump-mapped planet surface lit by one directional light plus ambient.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use image::RgbaImage;
use topo_config::RenderConfig;
use topo_terrain::SphereMesh;
use wgpu::util::DeviceExt;

use crate::texture::{GpuTexture, TextureError, create_surface_sampler};
use crate::{DepthBuffer, MeshBuffer, PlanetVertex};

pub const PLANET_SHADER_SOURCE: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    viewport: vec4<f32>,
};

struct Planet {
    model: mat4x4<f32>,
    // xyz: unit direction towards the light, w: intensity
    light: vec4<f32>,
    // rgb: light color, w: ambient intensity (white)
    light_color: vec4<f32>,
    // x: bump scale
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var color_map: texture_2d<f32>;
@group(1) @binding(1) var bump_map: texture_2d<f32>;
@group(1) @binding(2) var surface_sampler: sampler;
@group(1) @binding(3) var<uniform> planet: Planet;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_planet(in: VertexInput) -> VertexOutput {
    let world = planet.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = camera.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = (planet.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

// Screen-space height differences of the bump map.
fn bump_gradient(uv: vec2<f32>, scale: f32) -> vec2<f32> {
    let duv_dx = dpdx(uv);
    let duv_dy = dpdy(uv);
    let h = scale * textureSample(bump_map, surface_sampler, uv).x;
    let hx = scale * textureSample(bump_map, surface_sampler, uv + duv_dx).x;
    let hy = scale * textureSample(bump_map, surface_sampler, uv + duv_dy).x;
    return vec2<f32>(hx - h, hy - h);
}

// Tilt the surface normal by a height gradient without a tangent frame.
fn perturb_normal(position: vec3<f32>, normal: vec3<f32>, dh: vec2<f32>) -> vec3<f32> {
    let sigma_x = dpdx(position);
    let sigma_y = dpdy(position);
    let r1 = cross(sigma_y, normal);
    let r2 = cross(normal, sigma_x);
    let det = dot(sigma_x, r1);
    let grad = sign(det) * (dh.x * r1 + dh.y * r2);
    let n = abs(det) * normal - grad;
    if dot(n, n) < 1e-20 {
        return normal;
    }
    return normalize(n);
}

@fragment
fn fs_planet(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(color_map, surface_sampler, in.uv).rgb;
    let dh = bump_gradient(in.uv, planet.params.x);
    let n = perturb_normal(in.world_position, normalize(in.world_normal), dh);
    let diffuse = max(dot(n, planet.light.xyz), 0.0) * planet.light.w;
    let light = planet.light_color.rgb * diffuse + vec3<f32>(planet.light_color.w);
    return vec4<f32>(albedo * light, 1.0);
}
"#;

/// Directional and ambient light for the planet surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetLighting {
    /// Unit vector pointing from the scene towards the light.
    pub direction: Vec3,
    pub intensity: f32,
    pub color: [f32; 3],
    pub ambient: f32,
}

impl PlanetLighting {
    /// The light shines from `light_position` towards the origin.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            direction: Vec3::from_array(config.light_position)
                .try_normalize()
                .unwrap_or(Vec3::Y),
            intensity: config.light_intensity,
            color: config.light_color,
            ambient: config.ambient_intensity,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PlanetUniform {
    pub model: [[f32; 4]; 4],
    pub light: [f32; 4],
    pub light_color: [f32; 4],
    pub params: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<PlanetUniform>() % 16, 0);

impl PlanetUniform {
    pub fn new(model: Mat4, lighting: &PlanetLighting, bump_scale: f32) -> Self {
        let [r, g, b] = lighting.color;
        Self {
            model: model.to_cols_array_2d(),
            light: lighting.direction.extend(lighting.intensity).to_array(),
            light_color: [r, g, b, lighting.ambient],
            params: [bump_scale, 0.0, 0.0, 0.0],
        }
    }
}

pub struct PlanetPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// Group 1: color map, bump map, sampler, planet uniform.
    pub planet_bind_group_layout: wgpu::BindGroupLayout,
}

impl PlanetPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("planet-shader"),
            source: wgpu::ShaderSource::Wgsl(PLANET_SHADER_SOURCE.into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let planet_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("planet-bgl"),
                entries: &[
                    texture_entry(0),
                    texture_entry(1),
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: std::num::NonZeroU64::new(
                                std::mem::size_of::<PlanetUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("planet-pipeline-layout"),
            bind_group_layouts: &[camera_layout, &planet_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("planet-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_planet"),
                buffers: &[PlanetVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::opaque_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_planet"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            planet_bind_group_layout,
        }
    }
}

/// GPU resources for one planet build: mesh, surface maps and uniform.
pub struct PlanetRenderer {
    pub pipeline: PlanetPipeline,
    pub mesh: MeshBuffer,
    pub color: GpuTexture,
    pub bump: GpuTexture,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl PlanetRenderer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        mesh: &mut SphereMesh,
        color: &RgbaImage,
        bump: &RgbaImage,
    ) -> Result<Self, TextureError> {
        let pipeline = PlanetPipeline::new(device, surface_format, camera_layout);
        let color = GpuTexture::from_rgba(device, queue, "planet-color", color, true)?;
        let bump = GpuTexture::from_rgba(device, queue, "planet-bump", bump, false)?;
        let sampler = create_surface_sampler(device);

        let mesh_buffer = MeshBuffer::from_mesh(device, "planet", mesh);
        mesh.take_dirty();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("planet-uniform"),
            contents: bytemuck::bytes_of(&PlanetUniform::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("planet-bg"),
            layout: &pipeline.planet_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&color.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&bump.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        Ok(Self {
            pipeline,
            mesh: mesh_buffer,
            color,
            bump,
            uniform_buffer,
            bind_group,
        })
    }

    /// Upload a rebuilt mesh. Returns whether anything changed.
    pub fn sync_mesh(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &mut SphereMesh,
    ) -> bool {
        self.mesh.sync(device, queue, "planet", mesh)
    }

    pub fn update(
        &self,
        queue: &wgpu::Queue,
        model: Mat4,
        lighting: &PlanetLighting,
        bump_scale: f32,
    ) {
        let uniform = PlanetUniform::new(model, lighting, bump_scale);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn render<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_pipeline(&self.pipeline.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.bind(render_pass);
        self.mesh.draw(render_pass);
    }
}
