//! Perspective camera and orbit controls.
//!
//! [`OrbitControls`] keeps the camera on a sphere around a target point.
//! Input handlers only accumulate deltas, and [`OrbitControls::update`]
//! applies them once per frame. With damping enabled, each update applies a
//! fraction of the pending delta and decays the rest, which gives the
//! camera its inertia.

use std::f32::consts::PI;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLAR_EPSILON: f32 = 1e-4;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_y: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Orbit camera controller with optional damping.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from the target.
    radius: f32,
    /// Azimuth around +Y, measured from +Z.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,

    theta_delta: f32,
    phi_delta: f32,
    pan_offset: Vec3,
    scale: f32,

    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    /// Pixels panned per arrow-key press.
    pub key_pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    last_position: Vec3,
}

impl OrbitControls {
    /// Controls for a camera at `eye` looking at `target`.
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI / 2.0)
        };

        let mut controls = Self {
            target,
            radius,
            theta,
            phi,
            theta_delta: 0.0,
            phi_delta: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            key_pan_speed: 7.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            last_position: eye,
        };
        controls.last_position = controls.position();
        controls
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + Vec3::new(
                self.radius * sin_phi * self.theta.sin(),
                self.radius * self.phi.cos(),
                self.radius * sin_phi * self.theta.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Rotate for a pointer drag of `(dx, dy)` pixels in a viewport
    /// `viewport_height` pixels tall.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.theta_delta -= 2.0 * PI * dx / h * self.rotate_speed;
        self.phi_delta -= 2.0 * PI * dy / h * self.rotate_speed;
    }

    /// Zoom by wheel steps. Positive steps move the camera closer.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= 0.95_f32.powf(self.zoom_speed * steps);
    }

    /// Pan for a pointer drag of `(dx, dy)` pixels. The world under the
    /// pointer follows the pointer.
    pub fn pan(&mut self, dx: f32, dy: f32, viewport_height: f32, camera: &PerspectiveCamera) {
        let h = viewport_height.max(1.0);
        let position = self.position();
        let forward = (self.target - position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);

        let half_fov = (camera.fov_y.to_radians() * 0.5).tan();
        let target_distance = (position - self.target).length() * half_fov;

        self.pan_offset -= right * (2.0 * dx * target_distance / h);
        self.pan_offset += up * (2.0 * dy * target_distance / h);
    }

    /// Pan one arrow-key step.
    pub fn pan_key(&mut self, direction: PanDirection, viewport_height: f32, camera: &PerspectiveCamera) {
        let s = self.key_pan_speed;
        let (dx, dy) = match direction {
            PanDirection::Up => (0.0, s),
            PanDirection::Down => (0.0, -s),
            PanDirection::Left => (s, 0.0),
            PanDirection::Right => (-s, 0.0),
        };
        self.pan(dx, dy, viewport_height, camera);
    }

    /// Apply pending input. Returns whether the camera moved.
    pub fn update(&mut self) -> bool {
        let step = if self.enable_damping { self.damping_factor } else { 1.0 };

        self.theta += self.theta_delta * step;
        self.phi = (self.phi + self.phi_delta * step).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.radius = (self.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.theta_delta *= decay;
            self.phi_delta *= decay;
            self.pan_offset *= decay;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        let position = self.position();
        let moved = position.distance_squared(self.last_position) > 1e-10;
        self.last_position = position;
        moved
    }
}

impl Default for OrbitControls {
    /// Camera at `(0, 10, 10)` looking at the origin.
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO)
    }
}

/// Arrow-key pan directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    #[test]
    fn test_position_round_trips_eye() {
        let eye = Vec3::new(0.0, 10.0, 10.0);
        let controls = OrbitControls::new(eye, Vec3::ZERO);
        assert!(approx(controls.position(), eye));
        assert!((controls.distance() - 200.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_update_without_input_does_not_move() {
        let mut controls = OrbitControls::default();
        assert!(!controls.update());
        assert!(approx(controls.position(), Vec3::new(0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_damping_spreads_rotation_over_frames() {
        let mut controls = OrbitControls::default();
        controls.rotate(100.0, 0.0, 800.0);
        let before = controls.position();

        assert!(controls.update());
        let first = controls.position();
        assert!(controls.update());
        let second = controls.position();

        let step1 = first.distance(before);
        let step2 = second.distance(first);
        assert!(step1 > 0.0);
        assert!(step2 < step1);
        assert!((controls.distance() - 200.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_damping_converges_to_full_rotation() {
        let mut damped = OrbitControls::default();
        let mut direct = OrbitControls::default();
        direct.enable_damping = false;

        damped.rotate(50.0, 20.0, 600.0);
        direct.rotate(50.0, 20.0, 600.0);
        direct.update();
        for _ in 0..2000 {
            damped.update();
        }
        assert!(approx(damped.position(), direct.position()));
    }

    #[test]
    fn test_polar_angle_is_clamped() {
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.rotate(0.0, 100_000.0, 100.0);
        controls.update();
        let p = controls.position();
        assert!(p.y > 0.0);
        assert!(p.is_finite());
        assert!(controls.view_matrix().is_finite());
    }

    #[test]
    fn test_zoom_scales_distance() {
        let mut controls = OrbitControls::default();
        let d0 = controls.distance();
        controls.zoom(1.0);
        controls.update();
        assert!((controls.distance() - d0 * 0.95).abs() < 1e-4);

        controls.max_distance = d0;
        controls.zoom(-100.0);
        controls.update();
        assert_eq!(controls.distance(), d0);
    }

    #[test]
    fn test_pan_moves_target_and_eye_together() {
        let camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        let offset = controls.position() - controls.target;

        controls.pan(40.0, 0.0, 800.0, &camera);
        controls.update();

        assert!(controls.target.x < 0.0);
        assert!(approx(controls.position() - controls.target, offset));
    }

    #[test]
    fn test_arrow_up_raises_target() {
        let camera = PerspectiveCamera::default();
        let mut controls = OrbitControls::default();
        controls.enable_damping = false;
        controls.pan_key(PanDirection::Up, 800.0, &camera);
        controls.update();
        assert!(controls.target.y > 0.0);
    }

    #[test]
    fn test_set_aspect_ignores_degenerate() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(2.0);
        assert_eq!(camera.aspect, 2.0);
        camera.set_aspect(0.0);
        camera.set_aspect(f32::NAN);
        assert_eq!(camera.aspect, 2.0);
    }
}
