//! 3x3 rotation matrix.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat3 * Vec3`
//! - Rotations chain **right-to-left**: `A * B * v` applies B first, then A
//! - Euler construction applies X (theta), then Y (phi), then Z (psi)
//!
//! For pure rotations the transpose is the exact inverse, which is what the
//! transform pipeline relies on when mapping world coordinates into view space.

use std::ops::Mul;

use super::vec3::Vec3;

/// 3x3 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    data: [[f32; 3]; 3],
}

impl Mat3 {
    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Mat3 { data }
    }

    pub fn identity() -> Self {
        Mat3::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Creates a rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat3::new([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Creates a rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat3::new([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Creates a rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Mat3::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Creates a rotation from Euler angles (radians), applied X then Y then Z.
    pub fn from_euler(theta: f32, phi: f32, psi: f32) -> Self {
        Mat3::rotation_z(psi) * Mat3::rotation_y(phi) * Mat3::rotation_x(theta)
    }

    /// Returns the transpose, which for a rotation matrix is its inverse.
    pub fn transpose(&self) -> Self {
        let mut out = [[0.0f32; 3]; 3];
        for (r, row) in self.data.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                out[c][r] = *value;
            }
        }
        Mat3::new(out)
    }
}

impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Self::Output {
        let mut out = [[0.0f32; 3]; 3];
        for r in 0..3 {
            for c in 0..3 {
                out[r][c] = (0..3).map(|k| self.data[r][k] * rhs.data[k][c]).sum();
            }
        }
        Mat3::new(out)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(
            self.data[0][0] * rhs.x + self.data[0][1] * rhs.y + self.data[0][2] * rhs.z,
            self.data[1][0] * rhs.x + self.data[1][1] * rhs.y + self.data[1][2] * rhs.z,
            self.data[2][0] * rhs.x + self.data[2][1] * rhs.y + self.data[2][2] * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-5);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-5);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn identity_leaves_vector_unchanged() {
        let v = Vec3::new(1.0, -2.0, 3.0);
        assert_vec_eq(Mat3::identity() * v, v);
    }

    #[test]
    fn rotation_z_quarter_turn() {
        // A quarter turn about Z takes +X to +Y
        let v = Mat3::rotation_z(FRAC_PI_2) * Vec3::RIGHT;
        assert_vec_eq(v, Vec3::UP);
    }

    #[test]
    fn rotation_y_quarter_turn() {
        // A quarter turn about Y takes +Z to +X
        let v = Mat3::rotation_y(FRAC_PI_2) * Vec3::FORWARD;
        assert_vec_eq(v, Vec3::RIGHT);
    }

    #[test]
    fn transpose_inverts_rotation() {
        let rot = Mat3::from_euler(0.3, -1.1, 0.7);
        let v = Vec3::new(1.5, -0.25, 2.0);
        assert_vec_eq(rot.transpose() * (rot * v), v);
    }

    #[test]
    fn euler_composition_order() {
        // X rotation applied first: +Y goes to +Z, then the Y rotation
        // takes that +Z to +X.
        let rot = Mat3::from_euler(FRAC_PI_2, FRAC_PI_2, 0.0);
        assert_vec_eq(rot * Vec3::UP, Vec3::RIGHT);
    }

    #[test]
    fn composition_matches_sequential_application() {
        let a = Mat3::rotation_x(0.4);
        let b = Mat3::rotation_z(-0.9);
        let v = Vec3::new(0.5, 1.0, -2.0);
        assert_vec_eq((a * b) * v, a * (b * v));
    }
}
