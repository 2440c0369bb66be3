use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Initial camera placement, used again whenever the camera is reset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDefaults {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            position: Vec3::new(1000.0, 1000.0, 2000.0),
            target: Vec3::new(100.0, 100.0, 100.0),
            fov: 45.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

/// Perspective camera looking at a target point.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    view: Mat4,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov,
            aspect,
            near,
            far,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.look_at(Vec3::NEG_Z);
        camera.update_projection_matrix();
        camera
    }

    pub fn from_defaults(defaults: &CameraDefaults, aspect: f32) -> Self {
        let mut camera = Self::new(defaults.fov, aspect, defaults.near, defaults.far);
        camera.position = defaults.position;
        camera.look_at(defaults.target);
        camera
    }

    /// Orient the camera towards `target` from its current position.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        self.view = Mat4::look_at_rh(self.position, target, self.up);
    }

    /// Recompute the projection from fov/aspect/near/far.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect.max(1e-6),
            self.near,
            self.far,
        );
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }
}
