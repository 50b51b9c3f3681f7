//! Angle value wrapped onto a periodic range.

use std::f32::consts::TAU;
use std::ops::{AddAssign, SubAssign};

/// An angle in radians that wraps around into `[0, 2*pi)` on every update.
///
/// Useful for continuously spinning objects: the stored value never grows
/// without bound, so trig on it stays accurate over long runtimes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WrappedAngle {
    value: f32,
}

impl WrappedAngle {
    pub fn new(initial: f32) -> Self {
        Self {
            value: initial.rem_euclid(TAU),
        }
    }

    pub fn get(&self) -> f32 {
        self.value
    }
}

impl AddAssign<f32> for WrappedAngle {
    fn add_assign(&mut self, rhs: f32) {
        self.value = (self.value + rhs).rem_euclid(TAU);
    }
}

impl SubAssign<f32> for WrappedAngle {
    fn sub_assign(&mut self, rhs: f32) {
        self.value = (self.value - rhs).rem_euclid(TAU);
    }
}
