//! Perspective camera with reverse-Z projection and its GPU uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Per-frame camera data shared by every pipeline at bind group 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// World-space eye position, w unused.
    pub camera_pos: [f32; 4],
    /// Surface width and height in pixels, zw unused.
    pub viewport: [f32; 4],
}

static_assertions::const_assert_eq!(std::mem::size_of::<CameraUniform>(), 96);

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera from a vertical field of view in degrees and clip distances.
    pub fn perspective(fov_y_deg: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_deg.to_radians(),
            aspect_ratio,
            near,
            far,
        }
    }

    /// Place the camera at `eye` looking at `target` with +Y up.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.position = eye;
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    /// Reverse-Z perspective: near and far are swapped.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    pub fn to_uniform(&self, viewport: (u32, u32)) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            camera_pos: self.position.extend(1.0).to_array(),
            viewport: [viewport.0 as f32, viewport.1 as f32, 0.0, 0.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(45.0, 16.0 / 9.0, 1.0, 500.0)
    }
}

/// Uniform buffer, layout and bind group for [`CameraUniform`].
pub struct CameraBinding {
    pub buffer: wgpu::Buffer,
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera-uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera-bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera-bg"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            layout,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: &CameraUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(uniform));
    }
}
