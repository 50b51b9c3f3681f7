//! Perspective camera.
//!
//! # Coordinate System
//!
//! Left-handed: +X right, +Y up, +Z forward into the screen. A freshly
//! constructed camera looks down +Z.
//!
//! Projection maps world points into normalized screen space `[-1, 1]` on
//! both axes, with +Y up. The scene converts those coordinates to pixels.

use crate::math::mat3::Mat3;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

const DEFAULT_FOV_Y_DEGREES: f32 = 45.0;
const DEFAULT_Z_NEAR: f32 = 0.1;
const DEFAULT_Z_FAR: f32 = 10.0;

/// Result of projecting a world point.
#[derive(Clone, Copy, Debug)]
pub struct Projected {
    /// Normalized screen-space coordinates in `[-1, 1]`.
    pub screen: Vec2,
    /// View-space depth (distance along the camera's forward axis).
    pub depth: f32,
}

/// A perspective camera with position, orientation and view parameters.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Vec3,
    rotation: Mat3,
    fov_y: f32,
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Camera {
    /// Creates a camera at `position` looking down +Z.
    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        Self {
            position,
            rotation: Mat3::identity(),
            fov_y: DEFAULT_FOV_Y_DEGREES.to_radians(),
            aspect_ratio,
            z_near: DEFAULT_Z_NEAR,
            z_far: DEFAULT_Z_FAR,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Updates the aspect ratio. Must be called whenever the viewport resizes,
    /// otherwise projected geometry stretches.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    pub fn set_clip_planes(&mut self, z_near: f32, z_far: f32) {
        self.z_near = z_near;
        self.z_far = z_far;
    }

    /// Orients the camera to look at a world-space target.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize();
        let right = Vec3::UP.cross(forward).normalize();
        let up = forward.cross(right);
        // World basis vectors as matrix columns
        self.rotation = Mat3::new([
            [right.x, up.x, forward.x],
            [right.y, up.y, forward.y],
            [right.z, up.z, forward.z],
        ]);
    }

    /// Projects a world point into normalized screen space.
    ///
    /// Returns `None` when the point lies at or before the near plane, where
    /// the perspective divide is undefined. Callers treat that as "not
    /// drawable" for the current frame rather than an error.
    pub fn project_point(&self, point: Vec3) -> Option<Projected> {
        let view = self.rotation.transpose() * (point - self.position);
        if view.z <= self.z_near {
            return None;
        }
        let half_height = (self.fov_y / 2.0).tan();
        Some(Projected {
            screen: Vec2::new(
                view.x / (view.z * half_height * self.aspect_ratio),
                view.y / (view.z * half_height),
            ),
            depth: view.z,
        })
    }

    /// Backface test: true when the triangle faces the camera.
    ///
    /// Compares the sign of the dot product between the face normal and the
    /// camera-to-triangle vector. Only consulted in non-wireframe modes.
    pub fn check_culling(&self, center: Vec3, normal: Vec3) -> bool {
        normal.dot(center - self.position) < 0.0
    }
}
