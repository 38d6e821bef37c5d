//! Render pass configuration and per-frame command encoding.

/// Builder for the single scene pass: color clear plus optional depth.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth: Option<(wgpu::TextureView, f32)>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// Clears to black.
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Clear color from linear RGB, opaque.
    pub fn clear_rgb(self, rgb: [f32; 3]) -> Self {
        self.clear_color(wgpu::Color {
            r: rgb[0] as f64,
            g: rgb[1] as f64,
            b: rgb[2] as f64,
            a: 1.0,
        })
    }

    pub fn depth(mut self, view: wgpu::TextureView, clear_value: f32) -> Self {
        self.depth = Some((view, clear_value));
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth
                .as_ref()
                .map(|(view, clear)| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(*clear),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's command encoder and surface texture. [`FrameEncoder::submit`]
/// consumes it, so a frame cannot be presented twice.
pub struct FrameEncoder<'q> {
    encoder: wgpu::CommandEncoder,
    queue: &'q wgpu::Queue,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            queue,
            surface_texture,
            surface_view,
        }
    }

    pub fn begin_render_pass<'a>(&'a mut self, builder: &'a RenderPassBuilder) -> wgpu::RenderPass<'a> {
        builder.create_render_pass(&mut self.encoder, &self.surface_view)
    }

    pub fn queue(&self) -> &wgpu::Queue {
        self.queue
    }

    /// Submit recorded commands and present the surface texture.
    pub fn submit(self) {
        self.queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clear_is_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, wgpu::Color::BLACK);
        assert!(builder.depth.is_none());
    }

    #[test]
    fn test_clear_rgb_is_opaque() {
        let builder = RenderPassBuilder::new().clear_rgb([0.25, 0.5, 1.0]);
        assert_eq!(builder.clear_color.r, 0.25);
        assert_eq!(builder.clear_color.g, 0.5);
        assert_eq!(builder.clear_color.b, 1.0);
        assert_eq!(builder.clear_color.a, 1.0);
    }

    #[test]
    fn test_label_is_stored() {
        let builder = RenderPassBuilder::new().label("scene-pass");
        assert_eq!(builder.label, Some("scene-pass"));
    }
}
