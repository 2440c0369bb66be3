//! Shared value types used across the viewer crates.
//!
//! Nothing in here knows about files, GPUs or windows.

mod color;
mod types;
mod viewport;

pub use color::{Color, ColorParseError};
pub use types::{ObjectId, Transform};
pub use viewport::Viewport;
