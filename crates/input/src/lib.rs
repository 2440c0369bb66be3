//! Viewer input: host events translated into [`Action`] values.
//!
//! # Invariants
//! - The viewer consumes actions, never raw window events.
//! - There is no zoom or pan action; the camera controller only rotates.

pub mod action;

pub use action::{Action, PointerTracker};
