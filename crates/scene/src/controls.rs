//! Trackball camera controller, rotation only.
//!
//! Pointer positions are projected onto a virtual circle covering the
//! viewport. Dragging rotates the eye vector (target to camera) about the
//! axis perpendicular to both the drag and the eye, so the camera orbits the
//! target at a fixed distance. With dynamic damping the last rotation keeps
//! applying after the pointer stops, decaying every update.

use glam::{Quat, Vec2, Vec3};
use modelview_common::Viewport;
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;

/// Rotations below this angle (radians) end the damping tail.
const MIN_ANGLE: f32 = 1e-6;

/// Tunables for [`TrackballControls`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    pub enabled: bool,
    pub rotate_speed: f32,
    /// Stop as soon as the pointer stops instead of easing out.
    pub static_moving: bool,
    pub dynamic_damping_factor: f32,
    pub no_zoom: bool,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 1.0,
            static_moving: false,
            dynamic_damping_factor: 0.2,
            no_zoom: true,
        }
    }
}

/// Screen-space rectangle the controller maps pointer positions against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Viewport> for ScreenRect {
    fn from(v: Viewport) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: v.width as f32,
            height: v.height as f32,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrackballControls {
    pub settings: ControlsSettings,
    screen: ScreenRect,
    dragging: bool,
    move_prev: Vec2,
    move_curr: Vec2,
    last_axis: Vec3,
    last_angle: f32,
}

impl TrackballControls {
    pub fn new(settings: ControlsSettings, viewport: Viewport) -> Self {
        Self {
            settings,
            screen: viewport.into(),
            dragging: false,
            move_prev: Vec2::ZERO,
            move_curr: Vec2::ZERO,
            last_axis: Vec3::ZERO,
            last_angle: 0.0,
        }
    }

    /// Record the new screen rectangle after the surface changed size.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        self.screen = viewport.into();
    }

    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// True while a damping tail is still rotating the camera.
    pub fn is_settling(&self) -> bool {
        !self.settings.static_moving && self.last_angle.abs() > MIN_ANGLE
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.settings.enabled {
            return;
        }
        self.dragging = true;
        self.move_curr = self.mouse_on_circle(x, y);
        self.move_prev = self.move_curr;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.settings.enabled || !self.dragging {
            return;
        }
        self.move_prev = self.move_curr;
        self.move_curr = self.mouse_on_circle(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Drop any pending rotation, e.g. after the camera was reset.
    pub fn stop(&mut self) {
        self.move_prev = self.move_curr;
        self.last_angle = 0.0;
    }

    /// Apply pending rotation (or damping) and re-aim the camera at its target.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        if !self.settings.enabled {
            return;
        }
        let target = camera.target;
        let mut eye = camera.position - target;
        if self.rotate(&mut eye, &mut camera.up) {
            camera.position = target + eye;
        }
        camera.look_at(target);
    }

    /// Returns whether `eye` changed.
    fn rotate(&mut self, eye: &mut Vec3, up: &mut Vec3) -> bool {
        let delta = self.move_curr - self.move_prev;
        let angle = delta.length();
        let mut rotated = false;

        if angle > 0.0 {
            let eye_direction = eye.normalize_or_zero();
            let object_up = up.normalize_or_zero();
            let object_sideways = object_up.cross(eye_direction).normalize_or_zero();
            let move_direction = object_up * delta.y + object_sideways * delta.x;

            if let Some(axis) = move_direction.cross(*eye).try_normalize() {
                let angle = angle * self.settings.rotate_speed;
                let q = Quat::from_axis_angle(axis, angle);
                *eye = q * *eye;
                *up = q * *up;
                self.last_axis = axis;
                self.last_angle = angle;
                rotated = true;
            }
        } else if self.is_settling() {
            self.last_angle *= (1.0 - self.settings.dynamic_damping_factor).sqrt();
            let q = Quat::from_axis_angle(self.last_axis, self.last_angle);
            *eye = q * *eye;
            *up = q * *up;
            rotated = true;
        } else {
            self.last_angle = 0.0;
        }

        self.move_prev = self.move_curr;
        rotated
    }

    fn mouse_on_circle(&self, x: f32, y: f32) -> Vec2 {
        let s = self.screen;
        if s.width <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (x - s.width * 0.5 - s.left) / (s.width * 0.5),
            (s.height + 2.0 * (s.top - y)) / s.width,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraDefaults;

    fn setup(settings: ControlsSettings) -> (TrackballControls, PerspectiveCamera) {
        let viewport = Viewport::new(800, 400);
        let camera = PerspectiveCamera::from_defaults(&CameraDefaults::default(), 2.0);
        (TrackballControls::new(settings, viewport), camera)
    }

    fn drag(controls: &mut TrackballControls, camera: &mut PerspectiveCamera) {
        controls.pointer_down(400.0, 200.0);
        controls.pointer_move(480.0, 200.0);
        controls.update(camera);
        controls.pointer_up();
    }

    #[test]
    fn center_of_screen_maps_to_origin() {
        let (controls, _) = setup(ControlsSettings::default());
        assert_eq!(controls.mouse_on_circle(400.0, 200.0), Vec2::ZERO);
        assert_eq!(controls.mouse_on_circle(800.0, 200.0), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn drag_orbits_at_constant_distance() {
        let (mut controls, mut camera) = setup(ControlsSettings::default());
        let distance = camera.distance_to_target();
        let before = camera.position;

        drag(&mut controls, &mut camera);

        assert_ne!(camera.position, before);
        assert!((camera.distance_to_target() - distance).abs() < distance * 1e-4);
        assert_eq!(camera.target, CameraDefaults::default().target);
    }

    #[test]
    fn dynamic_damping_keeps_rotating_after_release() {
        let (mut controls, mut camera) = setup(ControlsSettings::default());
        drag(&mut controls, &mut camera);
        assert!(controls.is_settling());

        let after_drag = camera.position;
        controls.update(&mut camera);
        assert_ne!(camera.position, after_drag);
    }

    #[test]
    fn damping_decays_geometrically() {
        let (mut controls, mut camera) = setup(ControlsSettings::default());
        drag(&mut controls, &mut camera);
        let first = controls.last_angle;
        controls.update(&mut camera);
        let ratio = controls.last_angle / first;
        assert!((ratio - 0.8f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn static_moving_stops_immediately() {
        let (mut controls, mut camera) = setup(ControlsSettings {
            static_moving: true,
            ..ControlsSettings::default()
        });
        drag(&mut controls, &mut camera);
        assert!(!controls.is_settling());

        let after_drag = camera.position;
        controls.update(&mut camera);
        assert_eq!(camera.position, after_drag);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let (mut controls, mut camera) = setup(ControlsSettings {
            enabled: false,
            ..ControlsSettings::default()
        });
        let before = camera.position;
        drag(&mut controls, &mut camera);
        assert_eq!(camera.position, before);
        assert!(!controls.is_dragging());
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let (mut controls, mut camera) = setup(ControlsSettings::default());
        let before = camera.position;
        controls.pointer_move(10.0, 10.0);
        controls.update(&mut camera);
        assert_eq!(camera.position, before);
    }

    #[test]
    fn stop_cancels_the_damping_tail() {
        let (mut controls, mut camera) = setup(ControlsSettings::default());
        drag(&mut controls, &mut camera);
        controls.stop();
        assert!(!controls.is_settling());
        let pos = camera.position;
        controls.update(&mut camera);
        assert_eq!(camera.position, pos);
    }
}
