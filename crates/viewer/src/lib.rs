//! Viewer core: scene setup, parallel content loading and the frame loop.
//!
//! Lifecycle: [`ViewerApp::init_gl`] builds the renderer state, scene,
//! camera, controls and lighting rig. [`ViewerApp::init_content`] starts one
//! material-then-geometry pipeline per configured model. The frame loop keeps
//! drawing while models stream in and after the scene is ready.
//!
//! # Invariants
//! - The camera aspect equals the surface aspect (1 for zero height) before
//!   every draw.
//! - Each successful pipeline adds exactly one node; a failed one adds none
//!   and is recorded in the [`LoadReport`].
//! - The scene is only mutated on the thread that owns the [`ViewerApp`].

mod app;
mod config;
mod content;
mod error;
mod feedback;
mod frame_loop;

pub use app::{Phase, ViewerApp};
pub use config::{LightConfig, ModelConfig, ViewerConfig, WindowConfig};
pub use content::{ContentEvent, ContentLoader, LoadReport};
pub use error::{ConfigError, ViewerError};
pub use feedback::Feedback;
pub use frame_loop::{FrameLoop, LoopHandle};

pub fn crate_info() -> &'static str {
    "modelview-viewer v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("viewer"));
    }
}
