//! Vertex and index buffers for the sphere mesh.

use bytemuck::{Pod, Zeroable};
use topo_terrain::SphereMesh;
use wgpu::util::DeviceExt;

/// Interleaved planet vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PlanetVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(PlanetVertex, [u8; 32]);

impl PlanetVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlanetVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a mesh's attribute arrays.
pub fn planet_vertices(mesh: &SphereMesh) -> Vec<PlanetVertex> {
    mesh.positions()
        .iter()
        .zip(mesh.normals())
        .zip(mesh.uvs())
        .map(|((&position, &normal), &uv)| PlanetVertex {
            position,
            normal,
            uv,
        })
        .collect()
}

/// GPU copy of a sphere mesh. The planet and its glow shell draw from the same buffers.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn from_mesh(device: &wgpu::Device, label: &str, mesh: &SphereMesh) -> Self {
        let vertices = planet_vertices(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(mesh.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len() as u32,
            index_count: mesh.indices().len() as u32,
        }
    }

    /// Re-upload vertices if the mesh changed since the last sync.
    ///
    /// A mesh with the same topology is written in place; anything else
    /// replaces the buffers. Returns whether anything was uploaded.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        mesh: &mut SphereMesh,
    ) -> bool {
        if !mesh.take_dirty() {
            return false;
        }
        let same_topology = mesh.positions().len() as u32 == self.vertex_count
            && mesh.indices().len() as u32 == self.index_count;
        if same_topology {
            let vertices = planet_vertices(mesh);
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        } else {
            log::debug!("Mesh topology changed, recreating {label} buffers");
            *self = Self::from_mesh(device, label, mesh);
        }
        true
    }

    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
