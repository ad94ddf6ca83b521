//! Look-at camera producing the view-projection uniform.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Camera data shared by every scene pipeline.
///
/// `right` and `up` are the camera basis in world space, used to expand
/// billboards so they always face the viewer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub right: [f32; 4],
    pub up: [f32; 4],
}

impl CameraUniform {
    /// Identity transform: positions are taken as NDC. Used for overlays.
    pub fn screen_space(aspect: f32) -> Self {
        // Scale x so overlay geometry authored in a square keeps its shape.
        let view_proj = Mat4::from_scale(Vec3::new(1.0 / aspect.max(f32::EPSILON), 1.0, 1.0));
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            eye: [0.0, 0.0, 1.0, 1.0],
            right: [1.0, 0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0, 0.0],
        }
    }
}

/// Perspective camera looking from `eye` at `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 20.0, 45.0),
            target: Vec3::ZERO,
            fov_y: 60f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or(Vec3::X)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect = width / height.max(1.0);
    }

    pub fn to_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection_matrix().to_cols_array_2d(),
            eye: self.eye.extend(1.0).to_array(),
            right: self.right().extend(0.0).to_array(),
            up: self.up().extend(0.0).to_array(),
        }
    }
}
