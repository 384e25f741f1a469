//! CIE 1976 L\*a\*b\* and its cylindrical form L\*C\*h.
//!
//! Lab is the perceptually-motivated Cartesian space; [`Lch`] is the same
//! point described by lightness, chroma and hue angle. The two convert into
//! each other exactly (up to floating-point rounding):
//!
//! ```text
//! C = sqrt(a² + b²)      a = C·cos(h)
//! h = atan2(b, a) mod 360 b = C·sin(h)
//! ```
//!
//! At the neutral axis (`C = 0`) the hue is undefined; it is reported as `0`.
//!
//! ```rust
//! use tonal_colorspace::{Lab, Illuminant};
//!
//! let white = Lab::from_xyz(Illuminant::D65, Illuminant::D65);
//! assert!((white.l - 100.0).abs() < 1e-9);
//!
//! let lch = Lab::new(50.0, 0.0, 0.0).to_lch();
//! assert_eq!(lch.h, 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::math::{normalize_hue, square, to_degrees, to_radians};
use crate::xyz::Tristimulus;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    /// Hue angle in degrees, `[0, 360)`.
    pub h: f64,
}

/// Forward companding helper.
fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// Inverse companding helper.
fn lab_f_inv(t: f64) -> f64 {
    if t > 0.206896 {
        t * t * t
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Converts an XYZ color into Lab relative to `white`.
    ///
    /// Both arguments must use the same luminance scale.
    pub fn from_xyz(xyz: Tristimulus, white: Tristimulus) -> Self {
        let fx = lab_f(xyz.x / white.x);
        let fy = lab_f(xyz.y / white.y);
        let fz = lab_f(xyz.z / white.z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Converts back to XYZ on the luminance scale of `white`.
    pub fn to_xyz(&self, white: Tristimulus) -> Tristimulus {
        let fy = (self.l + 16.0) / 116.0;
        let fx = self.a / 500.0 + fy;
        let fz = fy - self.b / 200.0;

        Tristimulus::new(
            white.x * lab_f_inv(fx),
            white.y * lab_f_inv(fy),
            white.z * lab_f_inv(fz),
        )
    }

    pub fn to_lch(&self) -> Lch {
        let c = (square(self.a) + square(self.b)).sqrt();
        let h = if c == 0.0 {
            0.0
        } else {
            normalize_hue(to_degrees(self.b.atan2(self.a)))
        };
        Lch { l: self.l, c, h }
    }
}

impl Lch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    pub fn to_lab(&self) -> Lab {
        let h = to_radians(self.h);
        Lab {
            l: self.l,
            a: self.c * h.cos(),
            b: self.c * h.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xyz::Illuminant;

    #[test]
    fn white_is_full_lightness() {
        let lab = Lab::from_xyz(Illuminant::D65, Illuminant::D65);
        assert!((lab.l - 100.0).abs() < 1e-9);
        assert!(lab.a.abs() < 1e-9);
        assert!(lab.b.abs() < 1e-9);
    }

    #[test]
    fn black_is_zero_lightness() {
        let lab = Lab::from_xyz(Tristimulus::new(0.0, 0.0, 0.0), Illuminant::D65);
        assert!(lab.l.abs() < 1e-9);
    }

    #[test]
    fn mid_lightness_maps_to_eighteen_percent() {
        let xyz = Lab::new(50.0, 0.0, 0.0).to_xyz(Illuminant::D65);
        assert!((xyz.y - 0.1842).abs() < 1e-3, "got {}", xyz.y);
    }

    #[test]
    fn xyz_roundtrip() {
        let xyz = Tristimulus::new(0.3, 0.25, 0.6);
        let back = Lab::from_xyz(xyz, Illuminant::D65).to_xyz(Illuminant::D65);
        assert!((back.x - xyz.x).abs() < 1e-9);
        assert!((back.y - xyz.y).abs() < 1e-9);
        assert!((back.z - xyz.z).abs() < 1e-9);
    }

    #[test]
    fn lch_of_pure_axes() {
        let lch = Lab::new(60.0, 0.0, 30.0).to_lch();
        assert!((lch.c - 30.0).abs() < 1e-12);
        assert!((lch.h - 90.0).abs() < 1e-12);

        let lch = Lab::new(60.0, -10.0, 0.0).to_lch();
        assert!((lch.h - 180.0).abs() < 1e-12);

        let lch = Lab::new(60.0, 0.0, -5.0).to_lch();
        assert!((lch.h - 270.0).abs() < 1e-12);
    }

    #[test]
    fn neutral_hue_is_zero_not_nan() {
        let lch = Lab::new(42.0, 0.0, 0.0).to_lch();
        assert_eq!(lch.c, 0.0);
        assert_eq!(lch.h, 0.0);
        let lch = Lab::new(42.0, -0.0, -0.0).to_lch();
        assert_eq!(lch.h, 0.0);
    }
}
