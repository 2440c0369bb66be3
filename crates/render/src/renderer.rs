use std::fmt::Write;

use modelview_common::{Color, Viewport};
use modelview_scene::{NodeKind, PerspectiveCamera, Scene};

/// Errors a rendering backend can report.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// No usable rendering context: no adapter, no device or no surface.
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
    /// The surface failed in a way reconfiguring cannot fix.
    #[error("surface error: {0}")]
    Surface(String),
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// Frames are split into steps so hosts can record extra work (overlays)
/// between [`Renderer::draw`] and [`Renderer::end_frame`].
pub trait Renderer {
    /// Per-frame state handed back to the renderer at each step.
    type Frame;

    /// Current drawing surface size.
    fn viewport(&self) -> Viewport;

    /// Resize the drawing surface.
    fn set_size(&mut self, width: u32, height: u32);

    fn clear_color(&self) -> Color;

    fn set_clear_color(&mut self, color: Color);

    /// Whether [`Renderer::draw`] clears the target itself.
    fn auto_clear(&self) -> bool;

    fn set_auto_clear(&mut self, auto_clear: bool);

    /// Start a frame. `Ok(None)` means skip this frame (e.g. the surface was
    /// lost and has been reconfigured).
    fn begin_frame(&mut self) -> Result<Option<Self::Frame>, RenderError>;

    /// Explicitly clear color and depth.
    fn clear(&mut self, frame: &mut Self::Frame);

    /// Draw the scene as seen from the camera.
    fn draw(&mut self, frame: &mut Self::Frame, scene: &Scene, camera: &PerspectiveCamera);

    /// Submit and present.
    fn end_frame(&mut self, frame: Self::Frame);
}

/// Frame being described by a [`DebugTextRenderer`].
#[derive(Debug, Default)]
pub struct DebugFrame {
    pub text: String,
}

/// Headless renderer that describes each frame as text.
///
/// Useful for CLI output, logging, and testing the viewer without a GPU.
#[derive(Debug)]
pub struct DebugTextRenderer {
    viewport: Viewport,
    clear_color: Color,
    auto_clear: bool,
    frames: u64,
    clears: u64,
    last_frame: String,
}

impl DebugTextRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            clear_color: Color::BLACK,
            auto_clear: true,
            frames: 0,
            clears: 0,
            last_frame: String::new(),
        }
    }

    /// Frames presented so far.
    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    /// Explicit clears issued so far.
    pub fn explicit_clears(&self) -> u64 {
        self.clears
    }

    /// Text of the most recently presented frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl Renderer for DebugTextRenderer {
    type Frame = DebugFrame;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    fn clear_color(&self) -> Color {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn auto_clear(&self) -> bool {
        self.auto_clear
    }

    fn set_auto_clear(&mut self, auto_clear: bool) {
        self.auto_clear = auto_clear;
    }

    fn begin_frame(&mut self) -> Result<Option<DebugFrame>, RenderError> {
        if self.viewport.is_empty() {
            return Ok(None);
        }
        let mut frame = DebugFrame::default();
        let _ = writeln!(
            frame.text,
            "=== Frame {} ({}x{}) ===",
            self.frames + 1,
            self.viewport.width,
            self.viewport.height
        );
        Ok(Some(frame))
    }

    fn clear(&mut self, frame: &mut DebugFrame) {
        self.clears += 1;
        let _ = writeln!(frame.text, "Clear: {}", self.clear_color);
    }

    fn draw(&mut self, frame: &mut DebugFrame, scene: &Scene, camera: &PerspectiveCamera) {
        let out = &mut frame.text;
        if self.auto_clear {
            let _ = writeln!(out, "Clear: {} (auto)", self.clear_color);
        }
        let (p, t) = (camera.position, camera.target);
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3}",
            p.x, p.y, p.z, t.x, t.y, t.z, camera.fov, camera.aspect
        );
        let _ = writeln!(out, "Children: {}", scene.child_count());

        for (id, node) in scene.children() {
            let kind = match &node.kind {
                NodeKind::Light(light) => format!("light {light:?}"),
                NodeKind::Grid(grid) => {
                    format!("grid size={} divisions={}", grid.size, grid.divisions)
                }
                NodeKind::Model(model) => format!(
                    "model parts={} triangles={}",
                    model.parts.len(),
                    model.triangle_count()
                ),
            };
            let _ = writeln!(out, "  [{}] {} {}", id.short(), node.name, kind);
        }
    }

    fn end_frame(&mut self, frame: DebugFrame) {
        self.frames += 1;
        tracing::trace!(frame = self.frames, "debug frame presented");
        self.last_frame = frame.text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelview_scene::{CameraDefaults, GridHelper, SceneNode};

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::from_defaults(&CameraDefaults::default(), 2.0)
    }

    fn present(renderer: &mut DebugTextRenderer, scene: &Scene, explicit_clear: bool) {
        let mut frame = renderer.begin_frame().unwrap().unwrap();
        if explicit_clear {
            renderer.clear(&mut frame);
        }
        renderer.draw(&mut frame, scene, &camera());
        renderer.end_frame(frame);
    }

    #[test]
    fn empty_scene_frame() {
        let mut renderer = DebugTextRenderer::new(800, 400);
        present(&mut renderer, &Scene::new(), false);

        assert_eq!(renderer.frames_presented(), 1);
        let text = renderer.last_frame();
        assert!(text.contains("Frame 1 (800x400)"));
        assert!(text.contains("Children: 0"));
        assert!(text.contains("aspect=2.000"));
    }

    #[test]
    fn empty_viewport_skips_frame() {
        let mut renderer = DebugTextRenderer::new(800, 0);
        assert!(renderer.begin_frame().unwrap().is_none());

        renderer.set_size(800, 400);
        present(&mut renderer, &Scene::new(), false);
        assert_eq!(renderer.frames_presented(), 1);
    }

    #[test]
    fn frame_lists_children() {
        let mut scene = Scene::new();
        scene.add(SceneNode::new("grid", NodeKind::Grid(GridHelper::default())));

        let mut renderer = DebugTextRenderer::default();
        present(&mut renderer, &scene, false);
        assert!(renderer.last_frame().contains("grid size=1200 divisions=60"));
    }

    #[test]
    fn explicit_clear_is_counted() {
        let mut renderer = DebugTextRenderer::default();
        renderer.set_auto_clear(false);
        renderer.set_clear_color(Color::from_hex(0x050505));
        present(&mut renderer, &Scene::new(), true);

        assert_eq!(renderer.explicit_clears(), 1);
        assert!(renderer.last_frame().contains("Clear: #050505"));
        assert!(!renderer.last_frame().contains("(auto)"));
    }

    #[test]
    fn resize_updates_viewport() {
        let mut renderer = DebugTextRenderer::default();
        renderer.set_size(1024, 0);
        assert_eq!(renderer.viewport().aspect_ratio(), 1.0);
    }
}
