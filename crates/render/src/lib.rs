//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate either.
//! - A frame is `begin_frame` → optional `clear` → `draw` → `end_frame`.
//!
//! [`DebugTextRenderer`] implements the interface without a GPU so the viewer
//! can run headless and in tests.

mod renderer;

pub use renderer::{DebugFrame, DebugTextRenderer, RenderError, Renderer};

pub fn crate_info() -> &'static str {
    "modelview-render v0.1.0"
}
