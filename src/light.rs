//! Light sources.
//!
//! Lighting accumulates additively: each enabled light contributes a
//! non-negative RGB delta to a triangle based on the incidence angle between
//! the light and the face normal (and distance, for point lights).

use crate::color::{colors, ColorRgb};
use crate::math::vec3::Vec3;

/// The kind of light and its geometric parameters.
#[derive(Clone, Copy, Debug)]
pub enum LightKind {
    /// Parallel rays from a fixed direction, like the sun.
    /// `direction` is where the light points, not where it comes from.
    Directional { direction: Vec3 },
    /// Light radiating from a position with inverse-square falloff.
    Point { position: Vec3 },
}

/// A light source owned by the scene's light list.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    pub kind: LightKind,
    pub color: ColorRgb,
    pub intensity: f32,
    enabled: bool,
}

impl Light {
    /// Creates a directional light. The direction is normalized automatically.
    pub fn directional(direction: Vec3) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize(),
            },
            color: colors::WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }

    /// Creates a point light at the given position.
    pub fn point(position: Vec3) -> Self {
        Self {
            kind: LightKind::Point { position },
            color: colors::WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }

    pub fn with_color(mut self, color: ColorRgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Computes this light's contribution to a triangle.
    ///
    /// `center` and `normal` are in world space; the normal must be unit
    /// length. The result is non-negative in every channel; surfaces facing
    /// away from the light receive black, never a negative delta.
    pub fn contribution(&self, center: Vec3, normal: Vec3) -> ColorRgb {
        let factor = match self.kind {
            LightKind::Directional { direction } => (-direction).dot(normal).max(0.0),
            LightKind::Point { position } => {
                let to_light = position - center;
                let distance_sq = to_light.dot(to_light).max(f32::EPSILON);
                to_light.normalize().dot(normal).max(0.0) / distance_sq
            }
        };
        self.color * (factor * self.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direct_illumination() {
        // Light pointing toward -Z, normal facing +Z (toward the light)
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));
        let c = light.contribution(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-3);
        assert_relative_eq!(c.g, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn no_illumination_facing_away() {
        let light = Light::directional(Vec3::new(0.0, 0.0, -1.0));
        let c = light.contribution(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(c, ColorRgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn angled_illumination() {
        // Light pointing straight down, normal at 45 degrees
        let light = Light::directional(Vec3::new(0.0, -1.0, 0.0));
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let c = light.contribution(Vec3::ZERO, normal);
        // cos(45) = 0.707
        assert_relative_eq!(c.r, 0.707, epsilon = 1e-2);
    }

    #[test]
    fn point_light_falls_off_with_distance() {
        let light = Light::point(Vec3::new(0.0, 2.0, 0.0));
        let normal = Vec3::UP;
        let near = light.contribution(Vec3::new(0.0, 1.0, 0.0), normal);
        let far = light.contribution(Vec3::new(0.0, -1.0, 0.0), normal);
        assert!(near.r > far.r);
        // Inverse-square: 1 unit away vs 3 units away
        assert_relative_eq!(near.r / far.r.max(1e-6), 9.0, epsilon = 1e-2);
    }

    #[test]
    fn intensity_scales_contribution() {
        let light =
            Light::directional(Vec3::new(0.0, 0.0, -1.0)).with_intensity(0.25);
        let c = light.contribution(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(c.r, 0.25, epsilon = 1e-5);
    }
}
