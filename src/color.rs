//! Color values for the renderer.
//!
//! Colors are stored as four normalized `f32` components in `[0, 1]`. All
//! arithmetic saturates at the representation limits instead of overflowing,
//! so accumulating many light contributions can never wrap a channel. Byte
//! conversion happens only at the surface boundary via [`ColorRgb::to_argb8888`].

use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// An RGBA color with normalized float components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Grayscale constructor.
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Returns the RGB inverse of this color.
    pub fn invert(&self) -> Self {
        Self::new(1.0 - self.r, 1.0 - self.g, 1.0 - self.b)
    }

    /// Converts the color to grayscale using sRGB luminance coefficients.
    pub fn to_grayscale(&self) -> Self {
        let prime = self.r * 0.2126 + self.g * 0.7152 + self.b * 0.0722;
        Self::gray(prime)
    }

    /// Clamps every channel into `[0, 1]`.
    pub fn clamped(&self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    /// Maps a value in `[0, xmax]` onto a cold-to-hot gradient
    /// (black, blue, cyan, green, yellow, red).
    ///
    /// Used by the depth-map debug view to visualize the depth buffer.
    pub fn heat_map(x: f32, xmax: f32) -> Self {
        if xmax <= 0.0 {
            return colors::BLACK;
        }
        let t = (x / xmax).clamp(0.0, 1.0) * 5.0;
        let seg = t.floor().min(4.0);
        let f = t - seg;
        match seg as u32 {
            0 => ColorRgb::new(0.0, 0.0, f),
            1 => ColorRgb::new(0.0, f, 1.0),
            2 => ColorRgb::new(0.0, 1.0, 1.0 - f),
            3 => ColorRgb::new(f, 1.0, 0.0),
            _ => ColorRgb::new(1.0, 1.0 - f, 0.0),
        }
    }

    /// Packs the color into an ARGB8888 pixel.
    pub fn to_argb8888(&self) -> u32 {
        let c = self.clamped();
        let to_byte = |v: f32| (v * 255.0) as u32;
        (to_byte(c.a) << 24) | (to_byte(c.r) << 16) | (to_byte(c.g) << 8) | to_byte(c.b)
    }
}

/// Saturating component-wise addition. Alpha is taken from the left operand.
impl Add<ColorRgb> for ColorRgb {
    type Output = ColorRgb;

    fn add(self, rhs: ColorRgb) -> Self::Output {
        ColorRgb {
            r: (self.r + rhs.r).min(1.0),
            g: (self.g + rhs.g).min(1.0),
            b: (self.b + rhs.b).min(1.0),
            a: self.a,
        }
    }
}

impl AddAssign<ColorRgb> for ColorRgb {
    fn add_assign(&mut self, rhs: ColorRgb) {
        *self = *self + rhs;
    }
}

/// Saturating component-wise subtraction (floors at zero).
impl Sub<ColorRgb> for ColorRgb {
    type Output = ColorRgb;

    fn sub(self, rhs: ColorRgb) -> Self::Output {
        ColorRgb {
            r: (self.r - rhs.r).max(0.0),
            g: (self.g - rhs.g).max(0.0),
            b: (self.b - rhs.b).max(0.0),
            a: self.a,
        }
    }
}

/// Scaling by a non-negative factor, saturating at white.
impl Mul<f32> for ColorRgb {
    type Output = ColorRgb;

    fn mul(self, rhs: f32) -> Self::Output {
        ColorRgb {
            r: (self.r * rhs).clamp(0.0, 1.0),
            g: (self.g * rhs).clamp(0.0, 1.0),
            b: (self.b * rhs).clamp(0.0, 1.0),
            a: self.a,
        }
    }
}

impl Div<f32> for ColorRgb {
    type Output = ColorRgb;

    fn div(self, rhs: f32) -> Self::Output {
        ColorRgb {
            r: (self.r / rhs).clamp(0.0, 1.0),
            g: (self.g / rhs).clamp(0.0, 1.0),
            b: (self.b / rhs).clamp(0.0, 1.0),
            a: self.a,
        }
    }
}

/// Named color constants.
pub mod colors {
    use super::ColorRgb;

    // Grayscale
    pub const BLACK: ColorRgb = ColorRgb::new(0.0, 0.0, 0.0);
    pub const DKGRAY: ColorRgb = ColorRgb::gray(2.0 / 3.0);
    pub const LTGRAY: ColorRgb = ColorRgb::gray(1.0 / 3.0);
    pub const WHITE: ColorRgb = ColorRgb::new(1.0, 1.0, 1.0);

    // Primary
    pub const RED: ColorRgb = ColorRgb::new(1.0, 0.0, 0.0);
    pub const GREEN: ColorRgb = ColorRgb::new(0.0, 1.0, 0.0);
    pub const BLUE: ColorRgb = ColorRgb::new(0.0, 0.0, 1.0);

    // Secondary
    pub const YELLOW: ColorRgb = ColorRgb::new(1.0, 1.0, 0.0);
    pub const MAGENTA: ColorRgb = ColorRgb::new(1.0, 0.0, 1.0);
    pub const CYAN: ColorRgb = ColorRgb::new(0.0, 1.0, 1.0);

    // Tertiary
    pub const ORANGE: ColorRgb = ColorRgb::new(1.0, 0.5, 0.0);
    pub const CHARTREUSE: ColorRgb = ColorRgb::new(0.5, 1.0, 0.0);
    pub const SPRING: ColorRgb = ColorRgb::new(0.0, 1.0, 0.5);
    pub const AZURE: ColorRgb = ColorRgb::new(0.0, 0.5, 1.0);
    pub const VIOLET: ColorRgb = ColorRgb::new(0.5, 0.0, 1.0);
    pub const ROSE: ColorRgb = ColorRgb::new(1.0, 0.0, 0.5);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn addition_saturates_at_white() {
        let c = colors::WHITE + ColorRgb::new(0.5, 0.5, 0.5);
        assert_eq!(c, colors::WHITE);
    }

    #[test]
    fn subtraction_floors_at_black() {
        let c = ColorRgb::new(0.2, 0.0, 0.1) - colors::WHITE;
        assert_eq!(c, colors::BLACK);
    }

    #[test]
    fn scaling_saturates() {
        let c = ColorRgb::new(0.6, 0.1, 0.3) * 10.0;
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 1.0);
        assert_eq!(c.b, 1.0);
    }

    #[test]
    fn invert_round_trips() {
        let c = ColorRgb::new(0.25, 0.5, 0.75);
        assert_eq!(c.invert().invert(), c);
    }

    #[test]
    fn grayscale_uses_srgb_weights() {
        let c = colors::GREEN.to_grayscale();
        assert_relative_eq!(c.r, 0.7152, epsilon = 1e-5);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn heat_map_endpoints() {
        assert_eq!(ColorRgb::heat_map(0.0, 10.0), colors::BLACK);
        assert_eq!(ColorRgb::heat_map(10.0, 10.0), colors::RED);
        // Values past the range clamp to the hot end
        assert_eq!(ColorRgb::heat_map(25.0, 10.0), colors::RED);
    }

    #[test]
    fn tertiary_constants_mix_one_full_and_one_half_channel() {
        for c in [
            colors::ORANGE,
            colors::CHARTREUSE,
            colors::SPRING,
            colors::AZURE,
            colors::VIOLET,
            colors::ROSE,
        ] {
            let mut channels = [c.r, c.g, c.b];
            channels.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(channels, [0.0, 0.5, 1.0]);
        }
    }

    #[test]
    fn argb_packing() {
        assert_eq!(colors::WHITE.to_argb8888(), 0xFFFFFFFF);
        assert_eq!(colors::BLACK.to_argb8888(), 0xFF000000);
        assert_eq!(colors::RED.to_argb8888(), 0xFFFF0000);
    }
}
