//! Orbit camera around the planet with damped rotation.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use topo_config::InputConfig;

use crate::Camera;

/// Keeps the eye off the poles so the up vector stays defined.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.017;

/// Below this angular velocity (radians per update) damping is considered settled.
const REST_EPSILON: f32 = 1e-5;

/// Spherical orbit around a target point.
///
/// Yaw turns about +Y starting from the +Z axis, pitch lifts towards +Y.
/// Drags add angular velocity; each [`OrbitCamera::update`] applies a
/// `damping` fraction of it and keeps the rest, so the total rotation equals
/// the drag but eases out over several frames.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    rotate_sensitivity: f32,
    zoom_sensitivity: f32,
    damping: f32,
    invert_y: bool,
}

impl OrbitCamera {
    pub fn new(distance: f32, input: &InputConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            distance,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            rotate_sensitivity: input.rotate_sensitivity,
            zoom_sensitivity: input.zoom_sensitivity,
            damping: input.damping_factor.clamp(0.0, 1.0),
            invert_y: input.invert_y,
        }
    }

    /// Limit zoom to `[min, max]` and clamp the current distance into it.
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max.max(min);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self
    }

    /// Drag by a pointer delta in pixels. Dragging right swings the view to
    /// the right around the target; dragging down lifts the eye.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let dy = if self.invert_y { -dy } else { dy };
        let yaw = -dx * self.rotate_sensitivity;
        let pitch = dy * self.rotate_sensitivity;
        if self.damping > 0.0 {
            self.yaw_velocity += yaw;
            self.pitch_velocity += pitch;
        } else {
            self.apply(yaw, pitch);
        }
    }

    /// Zoom by scroll lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (-lines * self.zoom_sensitivity).exp();
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Two-finger pinch: spreading the fingers by `ratio` divides the distance by it.
    pub fn pinch(&mut self, ratio: f32) {
        if !ratio.is_finite() || ratio <= 0.0 {
            return;
        }
        self.distance = (self.distance / ratio).clamp(self.min_distance, self.max_distance);
    }

    /// Advance damping by one fixed step. Returns whether the camera is still moving.
    pub fn update(&mut self) -> bool {
        if self.damping <= 0.0 {
            return false;
        }
        let (yaw, pitch) = (
            self.yaw_velocity * self.damping,
            self.pitch_velocity * self.damping,
        );
        self.apply(yaw, pitch);
        self.yaw_velocity -= yaw;
        self.pitch_velocity -= pitch;

        let moving =
            self.yaw_velocity.abs() > REST_EPSILON || self.pitch_velocity.abs() > REST_EPSILON;
        if !moving {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
        }
        moving
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Point `camera` at the target from the current eye position.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.look_at(self.eye(), self.target);
    }

    fn apply(&mut self, yaw: f32, pitch: f32) {
        self.yaw = (self.yaw + yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(damping: f32) -> InputConfig {
        InputConfig {
            damping_factor: damping,
            ..InputConfig::default()
        }
    }

    #[test]
    fn test_starts_on_positive_z() {
        let orbit = OrbitCamera::new(35.0, &input(0.05));
        assert!((orbit.eye() - Vec3::new(0.0, 0.0, 35.0)).length() < 1e-5);
    }

    #[test]
    fn test_undamped_rotation_is_immediate() {
        let mut orbit = OrbitCamera::new(10.0, &input(0.0));
        orbit.rotate(-100.0, 0.0);
        assert!((orbit.yaw - 100.0 * 0.005).abs() < 1e-6);
        assert!(!orbit.update());
    }

    #[test]
    fn test_damped_rotation_converges_to_full_drag() {
        let mut orbit = OrbitCamera::new(10.0, &input(0.05));
        orbit.rotate(0.0, 100.0);
        assert_eq!(orbit.pitch, 0.0);

        assert!(orbit.update());
        assert!((orbit.pitch - 0.5 * 0.05).abs() < 1e-6);

        let mut steps = 1;
        while orbit.update() {
            steps += 1;
            assert!(steps < 1000, "damping never settled");
        }
        assert!((orbit.pitch - 0.5).abs() < 1e-3, "pitch {}", orbit.pitch);
    }

    #[test]
    fn test_pitch_is_clamped_short_of_the_poles() {
        let mut orbit = OrbitCamera::new(10.0, &input(0.0));
        orbit.rotate(0.0, 10_000.0);
        assert!((orbit.pitch - PITCH_LIMIT).abs() < 1e-6);
        orbit.rotate(0.0, -20_000.0);
        assert!((orbit.pitch + PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_invert_y_flips_pitch() {
        let config = InputConfig {
            invert_y: true,
            ..input(0.0)
        };
        let mut orbit = OrbitCamera::new(10.0, &config);
        orbit.rotate(0.0, 50.0);
        assert!(orbit.pitch < 0.0);
    }

    #[test]
    fn test_zoom_in_and_out() {
        let mut orbit = OrbitCamera::new(35.0, &input(0.05));
        orbit.zoom(1.0);
        assert!(orbit.distance < 35.0);
        orbit.zoom(-1.0);
        assert!((orbit.distance - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut orbit = OrbitCamera::new(35.0, &input(0.05)).with_distance_limits(12.0, 200.0);
        orbit.zoom(100.0);
        assert_eq!(orbit.distance, 12.0);
        orbit.zoom(-100.0);
        assert_eq!(orbit.distance, 200.0);
    }

    #[test]
    fn test_pinch_scales_distance() {
        let mut orbit = OrbitCamera::new(30.0, &input(0.0));
        orbit.pinch(2.0);
        assert!((orbit.distance - 15.0).abs() < 1e-5);
        orbit.pinch(0.0);
        orbit.pinch(f32::NAN);
        assert!((orbit.distance - 15.0).abs() < 1e-5);
    }

    #[test]
    fn test_eye_stays_at_distance() {
        let mut orbit = OrbitCamera::new(25.0, &input(0.0));
        orbit.rotate(240.0, -130.0);
        assert!((orbit.eye().length() - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_apply_to_points_camera_at_target() {
        let mut orbit = OrbitCamera::new(30.0, &input(0.0));
        orbit.rotate(80.0, 40.0);
        let mut camera = Camera::default();
        orbit.apply_to(&mut camera);
        let to_target = (orbit.target - camera.position).normalize();
        assert!((camera.forward() - to_target).length() < 1e-4);
    }
}
