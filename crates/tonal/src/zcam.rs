//! ZCAM color appearance model (Safdar et al. 2021), forward direction.
//!
//! ZCAM extends Jzazbz with viewing-condition dependent correlates. Absolute
//! XYZ is adapted toward the reference white, compressed with the perceptual
//! quantizer, and split into an achromatic signal `Iz` and two opponent
//! signals `az`/`bz`. Everything else is derived from those three numbers and
//! the factors cached on [`ViewingConditions`].
//!
//! Adaptation is CAT02 with a degree of adaptation `D`, toward D65. Input on
//! the reference white's axis is achromatic by definition: its opponent
//! signals are zero, so chroma is exactly 0 and hue 0.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tonal_colorspace::jzazbz::{
    lms_to_xyz, pq_decode, pq_encode, xyz_to_lms, OPPONENT_A, OPPONENT_B,
};
use tonal_colorspace::math::{normalize_hue, square, to_degrees, to_radians};
use tonal_colorspace::{Matrix3, Tristimulus};

use crate::viewing::ViewingConditions;

/// Black offset subtracted from the middle cone signal.
const EPSILON: f64 = 3.7035226210190005e-11;

/// Relative tolerance for a color being proportional to the white.
const WHITE_AXIS_TOLERANCE: f64 = 1e-9;

/// Unique hues: angle, eccentricity and quadrature for red, yellow, green,
/// blue and red again.
const UNIQUE_HUE_ANGLES: [f64; 5] = [33.44, 89.29, 146.30, 238.36, 393.44];
const UNIQUE_HUE_ECCENTRICITY: [f64; 5] = [0.68, 0.64, 1.52, 0.77, 0.68];
const UNIQUE_HUE_QUADRATURE: [f64; 5] = [0.0, 100.0, 200.0, 300.0, 400.0];

/// `(Iz + ε, az, bz)` back to PQ-encoded cone signals.
static OPPONENT_TO_CONES: Lazy<Matrix3> = Lazy::new(|| {
    Matrix3([[0.0, 1.0, 0.0], OPPONENT_A, OPPONENT_B]).inverse_unchecked()
});

fn dot(row: [f64; 3], v: [f64; 3]) -> f64 {
    row[0] * v[0] + row[1] * v[1] + row[2] * v[2]
}

/// `[Iz, az, bz]` for absolute, D65-adapted XYZ.
pub(crate) fn izazbz(xyz: Tristimulus) -> [f64; 3] {
    let lms = xyz_to_lms(xyz).map(pq_encode);
    [lms[1] - EPSILON, dot(OPPONENT_A, lms), dot(OPPONENT_B, lms)]
}

/// Whether `xyz` is a non-negative multiple of `white`.
pub(crate) fn on_white_axis(xyz: Tristimulus, white: Tristimulus) -> bool {
    let (v, w) = (xyz.to_array(), white.to_array());
    let cross = [
        v[1] * w[2] - v[2] * w[1],
        v[2] * w[0] - v[0] * w[2],
        v[0] * w[1] - v[1] * w[0],
    ];
    let norm = |a: [f64; 3]| dot(a, a).sqrt();
    dot(v, w) >= 0.0 && norm(cross) <= WHITE_AXIS_TOLERANCE * norm(v) * norm(w)
}

/// Adapted, compressed opponent signals `[Iz, az, bz]` for absolute XYZ.
pub(crate) fn opponent_signals(xyz: Tristimulus, vc: &ViewingConditions) -> [f64; 3] {
    let adapted = Tristimulus::from_array(vc.derived().adaptation.mul_vec(xyz.to_array()));
    let [iz, az, bz] = izazbz(adapted);
    if on_white_axis(xyz, vc.reference_white()) {
        [iz, 0.0, 0.0]
    } else {
        [iz, az, bz]
    }
}

/// Inverse of [`opponent_signals`].
///
/// Zero opponent signals give a multiple of the reference white. Signals
/// outside the physical cone range decode to NaN.
pub(crate) fn xyz_from_opponent(signals: [f64; 3], vc: &ViewingConditions) -> Tristimulus {
    let d = vc.derived();
    let [iz, az, bz] = signals;
    if az == 0.0 && bz == 0.0 {
        return vc.reference_white() * (pq_decode(iz + EPSILON) / d.white_cone);
    }
    let cones = OPPONENT_TO_CONES.mul_vec([iz + EPSILON, az, bz]);
    let adapted = lms_to_xyz(cones.map(pq_decode));
    Tristimulus::from_array(d.inverse_adaptation.mul_vec(adapted.to_array()))
}

/// Hue eccentricity factor `ez` for a hue angle in degrees.
pub(crate) fn eccentricity(hue: f64) -> f64 {
    1.015 + to_radians(89.038 + hue).cos()
}

/// Brightness `Qz` of an achromatic signal.
pub(crate) fn brightness(iz: f64, vc: &ViewingConditions) -> f64 {
    let d = vc.derived();
    d.qz_scale * iz.max(0.0).powf(d.qz_exponent)
}

/// Lightness `Jz` of an achromatic signal.
pub(crate) fn lightness(iz: f64, vc: &ViewingConditions) -> f64 {
    100.0 * brightness(iz, vc) / vc.derived().qz_w
}

/// Opponent magnitude `sqrt(az² + bz²)` that yields chroma `cz` at `hue`.
pub(crate) fn opponent_magnitude(cz: f64, hue: f64, vc: &ViewingConditions) -> f64 {
    if cz <= 0.0 {
        return 0.0;
    }
    let d = vc.derived();
    let mz = cz * d.qz_w / 100.0;
    let base = mz / (100.0 * eccentricity(hue).powf(0.068) * d.mz_scale);
    base.powf(1.0 / 0.74)
}

/// Hue quadrature `Hz` in `[0, 400)`.
pub fn hue_quadrature(hue: f64) -> f64 {
    let h = if hue < UNIQUE_HUE_ANGLES[0] {
        hue + 360.0
    } else {
        hue
    };
    let i = (0..4)
        .rev()
        .find(|&i| h >= UNIQUE_HUE_ANGLES[i])
        .unwrap_or(0);
    let (h_i, h_next) = (UNIQUE_HUE_ANGLES[i], UNIQUE_HUE_ANGLES[i + 1]);
    let (e_i, e_next) = (UNIQUE_HUE_ECCENTRICITY[i], UNIQUE_HUE_ECCENTRICITY[i + 1]);
    let t = (h - h_i) / e_i;
    UNIQUE_HUE_QUADRATURE[i] + 100.0 * t / (t + (h_next - h) / e_next)
}

/// Full set of ZCAM appearance correlates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZcamCorrelates {
    /// Brightness.
    pub qz: f64,
    /// Lightness, 0 (black) to 100 (reference white).
    pub jz: f64,
    /// Colorfulness.
    pub mz: f64,
    /// Chroma.
    pub cz: f64,
    /// Hue angle in degrees, `[0, 360)`.
    pub hz: f64,
    /// Hue quadrature, `[0, 400)`.
    pub hue_quadrature: f64,
    /// Saturation.
    pub sz: f64,
    /// Vividness.
    pub vz: f64,
    /// Blackness.
    pub kz: f64,
    /// Whiteness.
    pub wz: f64,
}

/// Cylindrical lightness / chroma / hue on the ZCAM scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZcamLch {
    pub l: f64,
    pub c: f64,
    /// Hue angle in degrees.
    pub h: f64,
}

impl ZcamLch {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.c.is_finite() && self.h.is_finite()
    }
}

impl ZcamCorrelates {
    /// Evaluates the forward model for absolute XYZ (cd/m²).
    pub fn from_xyz(xyz: Tristimulus, vc: &ViewingConditions) -> Self {
        let d = vc.derived();
        let [iz, az, bz] = opponent_signals(xyz, vc);

        let hz = if az == 0.0 && bz == 0.0 {
            0.0
        } else {
            normalize_hue(to_degrees(bz.atan2(az)))
        };
        let ez = eccentricity(hz);

        let qz = brightness(iz, vc);
        let jz = 100.0 * qz / d.qz_w;
        let mz = 100.0 * (square(az) + square(bz)).powf(0.37) * ez.powf(0.068) * d.mz_scale;
        let cz = 100.0 * mz / d.qz_w;
        let sz = if qz > 0.0 {
            100.0 * d.f_l.powf(0.6) * (mz / qz).sqrt()
        } else {
            0.0
        };

        ZcamCorrelates {
            qz,
            jz,
            mz,
            cz,
            hz,
            hue_quadrature: hue_quadrature(hz),
            sz,
            vz: (square(jz - 58.0) + 3.4 * square(cz)).sqrt(),
            kz: 100.0 - 0.8 * (square(jz) + 8.0 * square(cz)).sqrt(),
            wz: 100.0 - (square(100.0 - jz) + square(cz)).sqrt(),
        }
    }

    pub fn to_lch(&self) -> ZcamLch {
        ZcamLch::new(self.jz, self.cz, self.hz)
    }
}
