//! Scene state for the viewer: what is drawn and where it is seen from.
//!
//! # Invariants
//! - All scene mutations go through [`Scene::add`] / [`Scene::remove`], which
//!   bump the revision renderers use to resync GPU resources.
//! - The camera's view matrix is only updated by [`PerspectiveCamera::look_at`]
//!   and its projection only by [`PerspectiveCamera::update_projection_matrix`].

pub mod camera;
pub mod controls;
pub mod grid;
pub mod light;
pub mod scene;

pub use camera::{CameraDefaults, PerspectiveCamera};
pub use controls::{ControlsSettings, ScreenRect, TrackballControls};
pub use grid::{GridHelper, GridLine};
pub use light::Light;
pub use scene::{NodeKind, Scene, SceneNode};
