//! Orbit controls: drag to orbit, wheel to zoom, optional auto-rotation and a
//! smooth focus on the selected body.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};
use solar_config::CameraConfig;
use solar_render::Camera;

/// Auto-rotation rate at speed 1.0, in radians per second (one turn per
/// minute).
pub const AUTO_ROTATE_RATE: f32 = TAU / 60.0;

/// Keeps the camera off the poles.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.05;

/// Focus smoothing rate; higher converges faster.
const FOCUS_RATE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Orbit {
    yaw: f32,
    pitch: f32,
    distance: f32,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    orbit: Orbit,
    home: Orbit,
    focus: Vec3,
    fov_y: f32,
    min_distance: f32,
    max_distance: f32,
    auto_rotate_speed: f32,
    orbit_sensitivity: f32,
    zoom_sensitivity: f32,
    invert_y: bool,
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self {
            orbit: Orbit {
                yaw: 0.0,
                pitch: 0.0,
                distance: 1.0,
            },
            home: Orbit {
                yaw: 0.0,
                pitch: 0.0,
                distance: 1.0,
            },
            focus: Vec3::ZERO,
            fov_y: 0.0,
            min_distance: 0.0,
            max_distance: 0.0,
            auto_rotate_speed: 0.0,
            orbit_sensitivity: 0.0,
            zoom_sensitivity: 0.0,
            invert_y: false,
        };
        camera.configure(config);
        camera.orbit = camera.home;
        camera
    }

    /// Apply new limits and sensitivities without moving the camera, apart
    /// from re-clamping the distance.
    pub fn configure(&mut self, config: &CameraConfig) {
        self.min_distance = config.min_distance.max(0.01);
        self.max_distance = config.max_distance.max(self.min_distance);
        self.fov_y = config.fov_degrees.clamp(1.0, 179.0).to_radians();
        self.auto_rotate_speed = config.auto_rotate_speed;
        self.orbit_sensitivity = config.orbit_sensitivity;
        self.zoom_sensitivity = config.zoom_sensitivity;
        self.invert_y = config.invert_y;

        let start = Vec3::from_array(config.start_position);
        let distance = start.length();
        self.home = if distance > f32::EPSILON {
            Orbit {
                yaw: start.x.atan2(start.z),
                pitch: (start.y / distance).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT),
                distance: self.clamp_distance(distance),
            }
        } else {
            Orbit {
                yaw: 0.0,
                pitch: 0.0,
                distance: self.min_distance,
            }
        };
        self.orbit.distance = self.clamp_distance(self.orbit.distance);
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }

    /// Rotate by a cursor drag in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        let dy = if self.invert_y { -delta.y } else { delta.y };
        self.orbit.yaw -= delta.x * self.orbit_sensitivity;
        self.orbit.pitch =
            (self.orbit.pitch + dy * self.orbit_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Zoom by wheel lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        let factor = (1.0 - lines * self.zoom_sensitivity).max(0.1);
        self.orbit.distance = self.clamp_distance(self.orbit.distance * factor);
    }

    /// Advance auto-rotation and the focus glide by `dt` seconds.
    pub fn update(&mut self, dt: f32, auto_rotate: bool, focus_target: Vec3) {
        if auto_rotate {
            self.orbit.yaw =
                (self.orbit.yaw + self.auto_rotate_speed * AUTO_ROTATE_RATE * dt).rem_euclid(TAU);
        }
        let t = 1.0 - (-FOCUS_RATE * dt).exp();
        self.focus = self.focus.lerp(focus_target, t);
    }

    /// Back to the configured start view, centered on the origin.
    pub fn reset(&mut self) {
        self.orbit = self.home;
        self.focus = Vec3::ZERO;
    }

    pub fn distance(&self) -> f32 {
        self.orbit.distance
    }

    pub fn yaw(&self) -> f32 {
        self.orbit.yaw
    }

    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    pub fn eye(&self) -> Vec3 {
        let Orbit {
            yaw,
            pitch,
            distance,
        } = self.orbit;
        self.focus
            + Vec3::new(
                pitch.cos() * yaw.sin(),
                pitch.sin(),
                pitch.cos() * yaw.cos(),
            ) * distance
    }

    /// Write eye, target and field of view into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.focus;
        camera.fov_y = self.fov_y;
    }
}
