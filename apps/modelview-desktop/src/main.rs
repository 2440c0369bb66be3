mod overlay;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use modelview_input::{Action, PointerTracker};
use modelview_render_wgpu::{SurfaceOptions, WgpuRenderer};
use modelview_viewer::{ViewerApp, ViewerConfig};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::overlay::Overlay;

#[derive(Parser)]
#[command(name = "modelview-desktop", about = "Interactive OBJ/MTL model viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Viewer config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Exit after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Initial window width (overrides the config)
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height (overrides the config)
    #[arg(long)]
    height: Option<u32>,
}

struct DesktopApp {
    /// Taken when the window is created.
    config: Option<ViewerConfig>,
    max_frames: Option<u64>,
    window: Option<Arc<Window>>,
    viewer: Option<ViewerApp<WgpuRenderer>>,
    overlay: Option<Overlay>,
    pointer: PointerTracker,
    error: Option<anyhow::Error>,
}

impl DesktopApp {
    fn new(config: ViewerConfig, max_frames: Option<u64>) -> Self {
        Self {
            config: Some(config),
            max_frames,
            window: None,
            viewer: None,
            overlay: None,
            pointer: PointerTracker::new(),
            error: None,
        }
    }

    /// Window, renderer, viewer, then content loading and the frame loop.
    fn init(&mut self, event_loop: &ActiveEventLoop, config: ViewerConfig) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(PhysicalSize::new(config.window.width, config.window.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let renderer = WgpuRenderer::new(
            window.clone(),
            SurfaceOptions {
                antialias: config.window.antialias,
                vsync: true,
            },
        )?;
        let overlay = Overlay::new(&window, &renderer);

        let mut viewer = ViewerApp::init_gl(config, renderer)?;
        let size = window.inner_size();
        viewer.resize_display_gl(size.width, size.height);
        viewer.init_content();
        viewer.frame_loop_mut().set_max_frames(self.max_frames);
        viewer.frame_loop_mut().start();

        self.window = Some(window);
        self.viewer = Some(viewer);
        self.overlay = Some(overlay);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(viewer)) = (&self.window, &mut self.viewer) else {
            return;
        };

        let prepared = self
            .overlay
            .as_mut()
            .and_then(|overlay| overlay.prepare(window, viewer));
        let overlay = &mut self.overlay;
        let result = viewer.frame_with(|renderer, frame| {
            if let (Some(overlay), Some(prepared)) = (overlay.as_mut(), prepared) {
                overlay.paint(prepared, renderer, frame);
            }
        });

        match result {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(frames = viewer.frame_loop().frames(), "frame loop stopped");
                event_loop.exit();
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }
}

/// A left-button release always reaches the pointer tracker, even over the
/// overlay, so a drag cannot outlive the button.
fn ends_drag(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::MouseInput {
            button: MouseButton::Left,
            state: ElementState::Released,
            ..
        }
    )
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(config) = self.config.take() else {
            return;
        };
        if let Err(e) = self.init(event_loop, config) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };
        let consumed = self
            .overlay
            .as_mut()
            .is_some_and(|overlay| overlay.on_window_event(&window, &event));
        if consumed && !ends_drag(&event) {
            return;
        }
        let Some(viewer) = &mut self.viewer else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                viewer.apply(Action::Stop);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                viewer.resize_display_gl(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                viewer.apply(self.pointer.cursor_moved(position));
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                viewer.apply(self.pointer.button(state == ElementState::Pressed));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match key {
                KeyCode::KeyR => viewer.apply(Action::ResetCamera),
                KeyCode::Escape => viewer.apply(Action::Stop),
                KeyCode::F1 => {
                    if let Some(overlay) = &mut self.overlay {
                        overlay.toggle();
                    }
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(width) = cli.width {
        config.window.width = width;
    }
    if let Some(height) = cli.height {
        config.window.height = height;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("modelview-desktop starting");

    let config = load_config(&cli)?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = DesktopApp::new(config, cli.frames);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::DeviceId;

    fn mouse(button: MouseButton, state: ElementState) -> WindowEvent {
        WindowEvent::MouseInput {
            // SAFETY: the id is only compared, never handed to the platform.
            device_id: unsafe { DeviceId::dummy() },
            state,
            button,
        }
    }

    #[test]
    fn left_release_passes_through_overlay() {
        assert!(ends_drag(&mouse(MouseButton::Left, ElementState::Released)));
        assert!(!ends_drag(&mouse(MouseButton::Left, ElementState::Pressed)));
        assert!(!ends_drag(&mouse(MouseButton::Right, ElementState::Released)));
        assert!(!ends_drag(&WindowEvent::CloseRequested));
    }

    #[test]
    fn release_over_overlay_ends_rotation() {
        let mut pointer = PointerTracker::new();
        pointer.cursor_moved(Vec2::new(10.0, 10.0));
        assert!(matches!(pointer.button(true), Action::RotateStart(_)));

        let release = mouse(MouseButton::Left, ElementState::Released);
        assert!(ends_drag(&release));
        assert_eq!(pointer.button(false), Action::RotateEnd);
    }
}
