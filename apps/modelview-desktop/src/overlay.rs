//! egui overlay: load progress, load report, scene summary and key help.

use modelview_render_wgpu::{WgpuFrame, WgpuRenderer};
use modelview_tools::SceneInspector;
use modelview_viewer::ViewerApp;
use winit::event::WindowEvent;
use winit::window::Window;

/// egui output for one frame, ready to be recorded.
pub struct PreparedOverlay {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    screen_descriptor: egui_wgpu::ScreenDescriptor,
}

/// Texture updates egui has produced but no presented frame has uploaded.
///
/// egui hands each delta out once. A frame the surface skips must not lose
/// it, or the font atlas never reaches the GPU.
#[derive(Default)]
struct PendingTextures(egui::TexturesDelta);

impl PendingTextures {
    fn push(&mut self, delta: egui::TexturesDelta) {
        self.0.append(delta);
    }

    fn take(&mut self) -> egui::TexturesDelta {
        std::mem::take(&mut self.0)
    }
}

pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    textures: PendingTextures,
    visible: bool,
}

impl Overlay {
    pub fn new(window: &Window, renderer: &WgpuRenderer) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        // Recorded after the scene pass into the resolved surface view, so
        // no depth and no multisampling.
        let renderer =
            egui_wgpu::Renderer::new(renderer.device(), renderer.surface_format(), None, 1, false);
        Self {
            ctx,
            state,
            renderer,
            textures: PendingTextures::default(),
            visible: true,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "overlay toggled");
    }

    /// Returns true when egui consumed the event.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the UI for this frame. Texture updates are held until a frame
    /// is actually painted.
    pub fn prepare(
        &mut self,
        window: &Window,
        viewer: &ViewerApp<WgpuRenderer>,
    ) -> Option<PreparedOverlay> {
        if !self.visible {
            return None;
        }
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| draw_ui(ctx, viewer));
        self.state
            .handle_platform_output(window, full_output.platform_output);
        self.textures.push(full_output.textures_delta);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = window.inner_size();
        Some(PreparedOverlay {
            paint_jobs,
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: full_output.pixels_per_point,
            },
        })
    }

    /// Record the overlay into the frame, on top of the scene.
    pub fn paint(
        &mut self,
        prepared: PreparedOverlay,
        renderer: &WgpuRenderer,
        frame: &mut WgpuFrame,
    ) {
        let (device, queue) = (renderer.device(), renderer.queue());
        let textures = self.textures.take();
        for (id, image_delta) in &textures.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer.update_buffers(
            device,
            queue,
            &mut frame.encoder,
            &prepared.paint_jobs,
            &prepared.screen_descriptor,
        );
        {
            let mut pass = frame
                .encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, &prepared.paint_jobs, &prepared.screen_descriptor);
        }
        for id in &textures.free {
            self.renderer.free_texture(id);
        }
    }
}

fn draw_ui(ctx: &egui::Context, viewer: &ViewerApp<WgpuRenderer>) {
    let summary = SceneInspector::summary(viewer.scene());
    let camera = viewer.camera();

    egui::Window::new("modelview")
        .default_pos([12.0, 12.0])
        .default_width(300.0)
        .show(ctx, |ui| {
            if !viewer.feedback().is_empty() {
                ui.strong(viewer.feedback().text());
            }
            ui.label(format!("Phase: {:?}", viewer.phase()));
            if let Some(report) = viewer.report() {
                ui.label(format!(
                    "Loaded {}/{} models in {:.0} ms",
                    report.loaded.len(),
                    report.total(),
                    report.elapsed.as_secs_f64() * 1000.0
                ));
                for failure in &report.failures {
                    ui.colored_label(egui::Color32::LIGHT_RED, failure.to_string());
                }
            }
            ui.separator();

            ui.label(format!(
                "Nodes: {}  Lights: {}  Models: {}",
                summary.nodes,
                summary.lights(),
                summary.models
            ));
            ui.label(format!(
                "Vertices: {}  Triangles: {}",
                summary.vertices, summary.triangles
            ));
            ui.label(format!(
                "Camera: ({:.0}, {:.0}, {:.0})  aspect {:.3}",
                camera.position.x, camera.position.y, camera.position.z, camera.aspect
            ));
            ui.label(format!("Adapter: {}", viewer.renderer().adapter_info().name));
            ui.separator();
            ui.small("LMB drag: Rotate | R: Reset camera | Esc: Quit | F1: Toggle overlay");
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(id: u64) -> egui::TexturesDelta {
        let image = egui::ColorImage::new([1, 1], egui::Color32::WHITE);
        egui::TexturesDelta {
            set: vec![(
                egui::TextureId::Managed(id),
                egui::epaint::ImageDelta::full(image, egui::TextureOptions::LINEAR),
            )],
            free: Vec::new(),
        }
    }

    #[test]
    fn skipped_frame_keeps_texture_uploads() {
        let mut pending = PendingTextures::default();
        // First frame prepared, surface skipped, nothing painted.
        pending.push(upload(0));
        // Next frame brings its own delta.
        let mut next = upload(1);
        next.free.push(egui::TextureId::Managed(7));
        pending.push(next);

        let delta = pending.take();
        let ids: Vec<_> = delta.set.iter().map(|(id, _)| *id).collect();
        assert_eq!(
            ids,
            vec![egui::TextureId::Managed(0), egui::TextureId::Managed(1)]
        );
        assert_eq!(delta.free, vec![egui::TextureId::Managed(7)]);
    }

    #[test]
    fn take_empties_the_queue() {
        let mut pending = PendingTextures::default();
        pending.push(upload(0));
        assert!(!pending.take().is_empty());
        assert!(pending.take().is_empty());
    }
}
