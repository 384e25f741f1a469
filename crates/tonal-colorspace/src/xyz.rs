//! CIE 1931 XYZ tristimulus values.

use std::ops::{Div, Mul};

use serde::{Deserialize, Serialize};

use crate::math::{div3, scale3};

/// A CIE XYZ color. `y` is luminance, either relative (white = 1.0) or
/// absolute in cd/m², depending on the caller's convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tristimulus {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Tristimulus {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_array([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn luminance(&self) -> f64 {
        self.y
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Bit patterns of the three components, for exact-match keys.
    pub fn to_bits(self) -> [u64; 3] {
        [self.x.to_bits(), self.y.to_bits(), self.z.to_bits()]
    }
}

impl Mul<f64> for Tristimulus {
    type Output = Tristimulus;

    fn mul(self, luminance: f64) -> Tristimulus {
        Tristimulus::from_array(scale3(self.to_array(), luminance))
    }
}

/// Renormalizes against a luminance. Dividing by zero is a caller bug.
impl Div<f64> for Tristimulus {
    type Output = Tristimulus;

    fn div(self, luminance: f64) -> Tristimulus {
        debug_assert!(luminance != 0.0, "cannot renormalize against zero luminance");
        Tristimulus::from_array(div3(self.to_array(), luminance))
    }
}

/// Standard illuminants, relative (Y = 1).
pub struct Illuminant;

impl Illuminant {
    /// CIE D65 from its chromaticity `(0.3127, 0.3290)`, the sRGB white point.
    pub const D65: Tristimulus = Tristimulus::new(0.9504559270516717, 1.0, 1.0890577507598784);
}
