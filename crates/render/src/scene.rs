//! GPU buffers for one network and the per-frame draw.

use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::context::{DepthTarget, RenderContext};
use crate::geometry::{BlockRange, SceneGeometry};
use crate::pipeline::{BlockPipeline, LinePipeline, SceneBindings, SceneUniform};
use layerstack_camera::OrbitCamera;
use layerstack_core::{NetworkLayout, Rgb};

/// Uploaded vertex and index buffers.
struct SceneBuffers {
    block_vertices: wgpu::Buffer,
    block_indices: wgpu::Buffer,
    line_vertices: wgpu::Buffer,
    line_count: u32,
}

/// Draws the box stack: lines first, then translucent boxes far to near.
pub struct SceneRenderer {
    bindings: SceneBindings,
    block_pipeline: BlockPipeline,
    line_pipeline: LinePipeline,
    depth: DepthTarget,
    geometry: SceneGeometry,
    buffers: Option<SceneBuffers>,
}

impl SceneRenderer {
    /// Create pipelines and an empty scene.
    pub fn new(ctx: &RenderContext) -> Result<Self> {
        let bindings = SceneBindings::new(&ctx.device);
        let block_pipeline = BlockPipeline::new(ctx, bindings.layout())?;
        let line_pipeline = LinePipeline::new(ctx, bindings.layout())?;
        let depth = DepthTarget::new(&ctx.device, ctx.size);

        Ok(Self {
            bindings,
            block_pipeline,
            line_pipeline,
            depth,
            geometry: SceneGeometry::default(),
            buffers: None,
        })
    }

    /// Replace every buffer with geometry for `layout`.
    pub fn upload(&mut self, device: &wgpu::Device, layout: &NetworkLayout) {
        let geometry = SceneGeometry::from_layout(layout);

        self.buffers = if geometry.block_ranges.is_empty() && geometry.line_vertices.is_empty() {
            None
        } else {
            Some(SceneBuffers {
                block_vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Block Vertex Buffer"),
                    contents: bytemuck::cast_slice(&geometry.block_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                block_indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Block Index Buffer"),
                    contents: bytemuck::cast_slice(&geometry.block_indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                line_vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Line Vertex Buffer"),
                    contents: bytemuck::cast_slice(&geometry.line_vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                line_count: geometry.line_vertices.len() as u32,
            })
        };

        tracing::debug!(
            blocks = geometry.block_ranges.len(),
            block_vertices = geometry.block_vertices.len(),
            line_vertices = geometry.line_vertices.len(),
            "scene geometry uploaded"
        );
        self.geometry = geometry;
    }

    /// Match the depth buffer to a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, size: (u32, u32)) {
        if size.0 > 0 && size.1 > 0 && self.depth.size() != size {
            self.depth = DepthTarget::new(device, size);
        }
    }

    /// Record the scene pass into `encoder`, clearing `view` to white.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
    ) {
        self.bindings.update(queue, &SceneUniform::new(camera.view_proj()));

        let [r, g, b] = Rgb::BACKGROUND.to_linear();
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: self.depth.view(),
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        let Some(buffers) = &self.buffers else {
            return;
        };

        pass.set_bind_group(0, self.bindings.bind_group(), &[]);

        if buffers.line_count > 0 {
            pass.set_pipeline(self.line_pipeline.pipeline());
            pass.set_vertex_buffer(0, buffers.line_vertices.slice(..));
            pass.draw(0..buffers.line_count, 0..1);
        }

        if !self.geometry.block_ranges.is_empty() {
            let eye = camera.eye();
            let forward = (camera.target - eye).normalize_or_zero();
            pass.set_pipeline(self.block_pipeline.pipeline());
            pass.set_vertex_buffer(0, buffers.block_vertices.slice(..));
            pass.set_index_buffer(buffers.block_indices.slice(..), wgpu::IndexFormat::Uint32);
            for BlockRange { indices, .. } in self.geometry.back_to_front(eye, forward) {
                pass.draw_indexed(indices.clone(), 0, 0..1);
            }
        }
    }
}
