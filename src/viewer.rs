//! Window, GPU and UI state for the running viewer.

use anyhow::Result;
use glam::Vec2;
use std::sync::Arc;
use tracing::info;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoopWindowTarget;
use winit::window::Window;

use layerstack_camera::OrbitCamera;
use layerstack_core::{NetworkLayout, NetworkState};
use layerstack_input::InputState;
use layerstack_render::{RenderContext, SceneRenderer};
use layerstack_ui::{
    paint_labels, show_edit_button, show_legend, EditPanel, FontRegistry, PanelEvents,
};

use crate::config::ViewerConfig;

/// Legend text size in points.
const LEGEND_FONT_SIZE: f32 = 14.0;

/// What the event loop should do next.
pub enum ViewerAction {
    Continue,
    Quit,
}

pub struct Viewer {
    window: Arc<Window>,
    context: RenderContext,
    scene: SceneRenderer,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    camera: OrbitCamera,
    input: InputState,
    fonts: FontRegistry,
    panel: EditPanel,
    state: NetworkState,
    layout: NetworkLayout,
}

impl Viewer {
    /// Open the window and build the initial scene from `state`.
    pub fn new(
        event_loop: &EventLoopWindowTarget<()>,
        config: &ViewerConfig,
        resolution: Option<(u32, u32)>,
        state: NetworkState,
    ) -> Result<Self> {
        let (width, height) = resolution.unwrap_or((config.window.width, config.window.height));
        let window = Arc::new(
            winit::window::WindowBuilder::new()
                .with_title(config.window.title.as_str())
                .with_inner_size(winit::dpi::PhysicalSize::new(width, height))
                .build(event_loop)?,
        );

        let context = pollster::block_on(RenderContext::new(window.clone(), config.window.vsync))?;
        let scene = SceneRenderer::new(&context)?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&context.device, context.config.format, None, 1);

        let fonts = FontRegistry::discover();
        fonts.install(&egui_ctx);

        let mut camera = OrbitCamera::new(config.camera.orbit_settings());
        camera.set_aspect(context.size.0, context.size.1);

        let mut viewer = Self {
            window,
            context,
            scene,
            egui_ctx,
            egui_state,
            egui_renderer,
            camera,
            input: InputState::new(),
            fonts,
            panel: EditPanel::new(),
            state,
            layout: NetworkLayout::default(),
        };
        viewer.rebuild();
        Ok(viewer)
    }

    /// Lay out the current state, replace the GPU scene and recenter the camera.
    fn rebuild(&mut self) {
        self.layout = self.state.layout();
        self.scene.upload(&self.context.device, &self.layout);
        self.camera.look_at_network(self.layout.center_z());
        info!(
            layers = self.state.layers.len(),
            legend = self.state.legend.len(),
            total_length = self.layout.total_length,
            "scene rebuilt"
        );
    }

    /// Handle an event
    pub fn handle_event(&mut self, event: &Event<()>) -> ViewerAction {
        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                // Let egui handle the event first
                let response = self.egui_state.on_window_event(&self.window, event);
                if response.repaint {
                    self.window.request_redraw();
                }

                match event {
                    WindowEvent::CloseRequested => return ViewerAction::Quit,
                    WindowEvent::Resized(new_size) => {
                        self.resize(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => return self.render(),
                    other if response.consumed => self.input.handle_claimed_event(other),
                    other => self.input.handle_event(other),
                }
            }
            Event::AboutToWait => {
                self.window.request_redraw();
            }
            _ => {}
        }

        ViewerAction::Continue
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize((width, height));
        self.scene.resize(&self.context.device, (width, height));
        self.camera.set_aspect(width, height);
        tracing::debug!(width, height, "surface resized");
    }

    fn apply_camera_input(&mut self) {
        let frame = self.input.orbit_input();
        let viewport = Vec2::new(self.context.size.0 as f32, self.context.size.1 as f32);
        if !frame.is_empty() {
            self.camera.rotate(frame.rotate, viewport);
            self.camera.pan(frame.pan, viewport);
            self.camera.zoom_by(frame.zoom_steps);
        }
        self.input.begin_frame();
        self.camera.update();
    }

    fn run_ui(&mut self) -> egui::FullOutput {
        let raw_input = self.egui_state.take_egui_input(&self.window);

        let state = &self.state;
        let layout = &self.layout;
        let camera = &self.camera;
        let fonts = &self.fonts;
        let panel = &mut self.panel;
        let mut events = None;

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_labels(ctx, layout, camera, &state.params, fonts);
            show_legend(
                ctx,
                &state.legend,
                fonts.font_id(state.params.font, LEGEND_FONT_SIZE),
            );
            if !panel.is_open() && show_edit_button(ctx) {
                panel.open(state);
            }
            events = Some(panel.show(ctx, state));
        });

        let events: PanelEvents = events.unwrap_or_default();
        if let Some(font) = events.font {
            info!(font = font.family_name(), "label font changed");
            self.state.params.font = font;
        }
        if let Some(next) = events.applied {
            self.state = next;
            self.rebuild();
        }

        full_output
    }

    /// Render one frame
    fn render(&mut self) -> ViewerAction {
        self.apply_camera_input();

        let output = match self.context.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("Surface lost, reconfiguring");
                self.context.reconfigure();
                return ViewerAction::Continue;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory");
                return ViewerAction::Quit;
            }
            Err(e) => {
                tracing::warn!("Failed to get surface texture: {}", e);
                return ViewerAction::Continue;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let full_output = self.run_ui();
        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.context.config.width, self.context.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Viewer Render Encoder"),
                });

        self.scene
            .render(&self.context.queue, &mut encoder, &view, &self.camera);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(
                &self.context.device,
                &self.context.queue,
                *id,
                image_delta,
            );
        }

        self.egui_renderer.update_buffers(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        ViewerAction::Continue
    }
}
