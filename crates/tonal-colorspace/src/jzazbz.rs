//! Jzazbz (Safdar et al. 2017) and its cylindrical form Jzczhz.
//!
//! Jzazbz is built for high dynamic range: absolute XYZ (cd/m²) passes through
//! a cone-like LMS space and the SMPTE ST 2084 perceptual quantizer (PQ)
//! before being split into lightness and two opponent axes. It has better
//! hue linearity than CIELab, which makes it the space of choice for the
//! color-difference metric [`Jzczhz::de`].
//!
//! The LMS and PQ stages are public because the ZCAM appearance model is
//! built on top of them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::math::{normalize_hue, square, to_degrees, to_radians, Matrix3};
use crate::xyz::Tristimulus;

const B: f64 = 1.15;
const G: f64 = 0.66;
const C1: f64 = 3424.0 / 4096.0;
const C2: f64 = 2413.0 / 128.0;
const C3: f64 = 2392.0 / 128.0;
const ETA: f64 = 2610.0 / 16384.0;
const RHO: f64 = 1.7 * 2523.0 / 32.0;
const D: f64 = -0.56;
const D0: f64 = 1.6295499532821566e-11;

/// Luminance (cd/m²) that the perceptual quantizer maps to 1.0.
pub const PQ_PEAK_LUMINANCE: f64 = 10000.0;

/// Modified-XYZ to LMS.
pub const XYZ_TO_LMS: Matrix3 = Matrix3([
    [0.41478972, 0.579999, 0.0146480],
    [-0.2015100, 1.120649, 0.0531008],
    [-0.0166008, 0.264800, 0.6684799],
]);

/// Opponent axes shared by Jzazbz and ZCAM, applied to PQ-encoded LMS.
pub const OPPONENT_A: [f64; 3] = [3.524000, -4.066708, 0.542708];
pub const OPPONENT_B: [f64; 3] = [0.199076, 1.096799, -1.295875];

static LMS_TO_XYZ: Lazy<Matrix3> = Lazy::new(|| XYZ_TO_LMS.inverse_unchecked());

static IAB_TO_LMS: Lazy<Matrix3> = Lazy::new(|| {
    Matrix3([[0.5, 0.5, 0.0], OPPONENT_A, OPPONENT_B]).inverse_unchecked()
});

/// Encodes an absolute cone response with the PQ curve.
///
/// Negative responses are treated as zero light.
#[inline]
pub fn pq_encode(luminance: f64) -> f64 {
    let y = (luminance.max(0.0) / PQ_PEAK_LUMINANCE).powf(ETA);
    ((C1 + C2 * y) / (1.0 + C3 * y)).powf(RHO)
}

/// Decodes a PQ value back to absolute cone response.
///
/// Values at or below the curve's black offset decode to zero; negative
/// values have no physical meaning and decode to NaN.
#[inline]
pub fn pq_decode(encoded: f64) -> f64 {
    let v = encoded.powf(1.0 / RHO);
    if v <= C1 {
        return 0.0;
    }
    PQ_PEAK_LUMINANCE * ((C1 - v) / (C3 * v - C2)).powf(1.0 / ETA)
}

/// Absolute XYZ to linear LMS, including the blue-curvature correction.
pub fn xyz_to_lms(xyz: Tristimulus) -> [f64; 3] {
    let x = B * xyz.x - (B - 1.0) * xyz.z;
    let y = G * xyz.y - (G - 1.0) * xyz.x;
    XYZ_TO_LMS.mul_vec([x, y, xyz.z])
}

/// Inverse of [`xyz_to_lms`].
pub fn lms_to_xyz(lms: [f64; 3]) -> Tristimulus {
    let [xm, ym, z] = LMS_TO_XYZ.mul_vec(lms);
    let x = (xm + (B - 1.0) * z) / B;
    let y = (ym + (G - 1.0) * x) / G;
    Tristimulus::new(x, y, z)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jzazbz {
    pub jz: f64,
    pub az: f64,
    pub bz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jzczhz {
    pub jz: f64,
    pub cz: f64,
    /// Hue angle in degrees, `[0, 360)`.
    pub hz: f64,
}

impl Jzazbz {
    pub const fn new(jz: f64, az: f64, bz: f64) -> Self {
        Self { jz, az, bz }
    }

    /// Converts absolute XYZ (cd/m², D65-adapted) into Jzazbz.
    pub fn from_xyz_abs(xyz: Tristimulus) -> Self {
        let lms = xyz_to_lms(xyz).map(pq_encode);
        let iz = 0.5 * (lms[0] + lms[1]);
        let az = OPPONENT_A[0] * lms[0] + OPPONENT_A[1] * lms[1] + OPPONENT_A[2] * lms[2];
        let bz = OPPONENT_B[0] * lms[0] + OPPONENT_B[1] * lms[1] + OPPONENT_B[2] * lms[2];
        let jz = ((1.0 + D) * iz) / (1.0 + D * iz) - D0;
        Jzazbz { jz, az, bz }
    }

    /// Converts back to absolute XYZ.
    pub fn to_xyz_abs(&self) -> Tristimulus {
        let jz = self.jz + D0;
        let iz = jz / (1.0 + D - D * jz);
        let lms = IAB_TO_LMS.mul_vec([iz, self.az, self.bz]).map(pq_decode);
        lms_to_xyz(lms)
    }

    pub fn to_jzczhz(&self) -> Jzczhz {
        let cz = (square(self.az) + square(self.bz)).sqrt();
        let hz = if cz == 0.0 {
            0.0
        } else {
            normalize_hue(to_degrees(self.bz.atan2(self.az)))
        };
        Jzczhz { jz: self.jz, cz, hz }
    }
}

impl Jzczhz {
    pub const fn new(jz: f64, cz: f64, hz: f64) -> Self {
        Self { jz, cz, hz }
    }

    pub fn to_jzazbz(&self) -> Jzazbz {
        let h = to_radians(self.hz);
        Jzazbz {
            jz: self.jz,
            az: self.cz * h.cos(),
            bz: self.cz * h.sin(),
        }
    }

    /// Perceptual color difference between two colors.
    ///
    /// `sqrt(ΔJz² + ΔCz² + 4·Cz₁·Cz₂·sin²(Δh/2))`. Non-negative, symmetric,
    /// and zero for identical colors.
    ///
    /// `Δh` is converted to radians before the sine, which makes the result
    /// equal to the Euclidean distance in Jzazbz. Implementations that feed
    /// the degree difference straight into `sin` produce different values,
    /// so contrast thresholds tuned against those do not carry over.
    pub fn de(&self, other: &Jzczhz) -> f64 {
        let dh = to_radians(self.hz - other.hz);
        (square(self.jz - other.jz)
            + square(self.cz - other.cz)
            + 4.0 * self.cz * other.cz * square((dh / 2.0).sin()))
        .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xyz::Illuminant;

    #[test]
    fn pq_roundtrip() {
        for l in [0.01, 1.0, 80.0, 200.0, 1000.0, 9000.0] {
            let back = pq_decode(pq_encode(l));
            assert!((back - l).abs() / l < 1e-9, "{} -> {}", l, back);
        }
    }

    #[test]
    fn pq_black_decodes_to_zero() {
        assert!(pq_decode(pq_encode(0.0)) < 1e-60);
        assert!(pq_decode(-0.5).is_nan());
    }

    #[test]
    fn pq_peak_is_one() {
        assert!((pq_encode(PQ_PEAK_LUMINANCE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lms_roundtrip() {
        let xyz = Tristimulus::new(41.2, 21.3, 1.9);
        let back = lms_to_xyz(xyz_to_lms(xyz));
        assert!((back.x - xyz.x).abs() < 1e-9);
        assert!((back.y - xyz.y).abs() < 1e-9);
        assert!((back.z - xyz.z).abs() < 1e-9);
    }

    #[test]
    fn xyz_roundtrip() {
        let xyz = Tristimulus::new(60.0, 45.0, 12.0);
        let back = Jzazbz::from_xyz_abs(xyz).to_xyz_abs();
        assert!((back.x - xyz.x).abs() / xyz.x < 1e-7);
        assert!((back.y - xyz.y).abs() / xyz.y < 1e-7);
        assert!((back.z - xyz.z).abs() / xyz.z < 1e-7);
    }

    #[test]
    fn white_is_nearly_neutral() {
        let jab = Jzazbz::from_xyz_abs(Illuminant::D65 * 200.0);
        assert!(jab.jz > 0.1 && jab.jz < 0.3, "jz = {}", jab.jz);
        assert!(jab.to_jzczhz().cz < 1e-3);
    }

    #[test]
    fn brighter_is_lighter() {
        let dim = Jzazbz::from_xyz_abs(Illuminant::D65 * 20.0);
        let bright = Jzazbz::from_xyz_abs(Illuminant::D65 * 200.0);
        assert!(bright.jz > dim.jz);
    }

    #[test]
    fn cylindrical_roundtrip() {
        let jab = Jzazbz::new(0.12, -0.01, 0.02);
        let back = jab.to_jzczhz().to_jzazbz();
        assert!((back.jz - jab.jz).abs() < 1e-12);
        assert!((back.az - jab.az).abs() < 1e-12);
        assert!((back.bz - jab.bz).abs() < 1e-12);
    }

    #[test]
    fn neutral_hue_is_zero() {
        assert_eq!(Jzazbz::new(0.1, 0.0, 0.0).to_jzczhz().hz, 0.0);
    }

    #[test]
    fn de_identity_and_symmetry() {
        let p = Jzczhz::new(0.1, 0.05, 30.0);
        let q = Jzczhz::new(0.12, 0.02, 300.0);
        assert_eq!(p.de(&p), 0.0);
        assert!((p.de(&q) - q.de(&p)).abs() < 1e-15);
        assert!(p.de(&q) > 0.0);
    }

    #[test]
    fn de_matches_cartesian_distance() {
        let p = Jzczhz::new(0.1, 0.05, 30.0);
        let q = Jzczhz::new(0.12, 0.02, 120.0);
        let (a, b) = (p.to_jzazbz(), q.to_jzazbz());
        let euclid = (square(a.jz - b.jz) + square(a.az - b.az) + square(a.bz - b.bz)).sqrt();
        assert!((p.de(&q) - euclid).abs() < 1e-12);
    }
}
