//! wgpu render backend for the model viewer.
//!
//! Draws the scene's grid helpers as lines and its models as Lambert-lit
//! triangles, using the scene's directional and ambient lights.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - GPU buffers are resynced only when the scene revision changes.
//! - Node transforms are baked into vertex data at upload time.

mod geometry;
mod gpu;
mod shaders;

pub use gpu::{SurfaceOptions, WgpuFrame, WgpuRenderer};
