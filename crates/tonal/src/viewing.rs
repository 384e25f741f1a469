//! Viewing conditions: the environment a color is judged in.
//!
//! A [`ViewingConditions`] snapshot captures four inputs (reference white,
//! adapting luminance, background luminance and surround) and precomputes
//! every ZCAM factor that depends only on them. It is immutable and lives for
//! one theme activation.
//!
//! Two snapshots compare equal (and hash equal) only when all four inputs are
//! bit-identical, so they can be used directly as cache keys.

use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tonal_colorspace::jzazbz::xyz_to_lms;
use tonal_colorspace::{Illuminant, Lab, Matrix3, Tristimulus};

use crate::error::{ConfigError, Result};
use crate::zcam;

/// Default display white, in cd/m².
pub const DEFAULT_WHITE_LUMINANCE: f64 = 200.0;

/// Default background relative luminance (a mid-dark gray).
pub const DEFAULT_BACKGROUND: f64 = 0.2;

/// CIECAM02 chromatic adaptation space.
const CAT02: Matrix3 = Matrix3([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

static CAT02_INVERSE: Lazy<Matrix3> = Lazy::new(|| CAT02.inverse_unchecked());

/// Relative luminance of the surround field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surround {
    #[default]
    Average,
    Dim,
    Dark,
}

impl Surround {
    /// Surround factor `F_s`.
    pub fn factor(self) -> f64 {
        match self {
            Surround::Average => 0.69,
            Surround::Dim => 0.59,
            Surround::Dark => 0.525,
        }
    }

    /// Factor `F` scaling the degree of adaptation.
    pub fn adaptation_factor(self) -> f64 {
        match self {
            Surround::Average => 1.0,
            Surround::Dim => 0.9,
            Surround::Dark => 0.8,
        }
    }
}

/// Degree of adaptation `D` for an adapting luminance, in `[0, 1]`.
pub fn degree_of_adaptation(surround: Surround, adapting_luminance: f64) -> f64 {
    let f = surround.adaptation_factor();
    (f * (1.0 - ((-adapting_luminance - 42.0) / 92.0).exp() / 3.6)).clamp(0.0, 1.0)
}

/// Factors derived once from the four inputs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Derived {
    /// Surround factor.
    pub f_s: f64,
    /// Background factor, `sqrt(Y_b)`.
    pub f_b: f64,
    /// Luminance level adaptation factor.
    pub f_l: f64,
    /// Degree of adaptation.
    pub d: f64,
    /// CAT02 transform from the reference white to D65.
    pub adaptation: Matrix3,
    /// D65 back to the reference white.
    pub inverse_adaptation: Matrix3,
    /// Middle cone response of the adapted reference white.
    pub white_cone: f64,
    /// Achromatic signal of the reference white.
    pub iz_w: f64,
    /// Brightness of the reference white.
    pub qz_w: f64,
    /// Exponent applied to `Iz` in the brightness formula.
    pub qz_exponent: f64,
    /// Constant multiplier of the brightness formula.
    pub qz_scale: f64,
    /// Constant multiplier of the colorfulness formula (without the `100`).
    pub mz_scale: f64,
}

/// Immutable viewing-condition snapshot.
#[derive(Debug, Clone)]
pub struct ViewingConditions {
    reference_white: Tristimulus,
    adapting_luminance: f64,
    background_luminance: f64,
    surround: Surround,
    derived: Derived,
}

/// Bit-level identity of a [`ViewingConditions`], cheap to copy and hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewingSignature {
    white: [u64; 3],
    adapting_luminance: u64,
    background_luminance: u64,
    surround: Surround,
}

fn positive_finite(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl ViewingConditions {
    /// Validates the inputs and precomputes the derived ZCAM factors.
    ///
    /// `reference_white` is absolute XYZ: its `y` is the white luminance in
    /// cd/m².
    pub fn new(
        reference_white: Tristimulus,
        adapting_luminance: f64,
        background_luminance: f64,
        surround: Surround,
    ) -> Result<Self> {
        if !positive_finite(adapting_luminance) {
            return Err(ConfigError::InvalidAdaptingLuminance(adapting_luminance));
        }
        if !(background_luminance > 0.0 && background_luminance <= 1.0) {
            return Err(ConfigError::InvalidBackground(background_luminance));
        }
        let degenerate = || ConfigError::DegenerateWhite {
            x: reference_white.x,
            y: reference_white.y,
            z: reference_white.z,
        };
        if !reference_white.to_array().into_iter().all(positive_finite) {
            return Err(degenerate());
        }

        let d = degree_of_adaptation(surround, adapting_luminance);
        let rgb_w = CAT02.mul_vec(reference_white.to_array());
        let rgb_d65 = CAT02.mul_vec(Illuminant::D65.to_array());
        let gains: [f64; 3] = std::array::from_fn(|i| {
            let source = d * reference_white.y / rgb_w[i] + 1.0 - d;
            let target = d * Illuminant::D65.y / rgb_d65[i] + 1.0 - d;
            source / target
        });
        if !rgb_w.into_iter().chain(gains).all(positive_finite) {
            return Err(degenerate());
        }
        let adaptation = CAT02_INVERSE.mul(&Matrix3::diagonal(gains)).mul(&CAT02);
        let inverse_adaptation = CAT02_INVERSE
            .mul(&Matrix3::diagonal(gains.map(|g| 1.0 / g)))
            .mul(&CAT02);

        let white_cone =
            xyz_to_lms(Tristimulus::from_array(adaptation.mul_vec(reference_white.to_array())))[1];
        if !positive_finite(white_cone) {
            return Err(degenerate());
        }

        let f_s = surround.factor();
        let f_b = background_luminance.sqrt();
        let f_l = 0.171
            * adapting_luminance.cbrt()
            * (1.0 - (-48.0 / 9.0 * adapting_luminance).exp());

        // the white's own signal, before adaptation
        let [iz_w, _, _] = zcam::izazbz(reference_white);
        if !positive_finite(iz_w) {
            return Err(degenerate());
        }

        let qz_exponent = 1.6 * f_s / f_b.powf(0.12);
        let qz_scale = 2700.0 * f_s.powf(2.2) * f_b.sqrt() * f_l.powf(0.2);
        let qz_w = qz_scale * iz_w.powf(qz_exponent);
        let mz_scale = f_l.powf(0.2) / (f_b.powf(0.1) * iz_w.powf(0.78));

        Ok(ViewingConditions {
            reference_white,
            adapting_luminance,
            background_luminance,
            surround,
            derived: Derived {
                f_s,
                f_b,
                f_l,
                d,
                adaptation,
                inverse_adaptation,
                white_cone,
                iz_w,
                qz_w,
                qz_exponent,
                qz_scale,
                mz_scale,
            },
        })
    }

    pub fn builder() -> ViewingConditionsBuilder {
        ViewingConditionsBuilder::default()
    }

    /// Absolute reference white.
    pub fn reference_white(&self) -> Tristimulus {
        self.reference_white
    }

    /// Luminance of the reference white, in cd/m².
    pub fn white_luminance(&self) -> f64 {
        self.reference_white.y
    }

    pub fn adapting_luminance(&self) -> f64 {
        self.adapting_luminance
    }

    pub fn background_luminance(&self) -> f64 {
        self.background_luminance
    }

    pub fn surround(&self) -> Surround {
        self.surround
    }

    /// Achromatic signal `Iz` of the reference white.
    pub fn white_iz(&self) -> f64 {
        self.derived.iz_w
    }

    /// Brightness `Qz` of the reference white.
    pub fn white_brightness(&self) -> f64 {
        self.derived.qz_w
    }

    /// Luminance level adaptation factor `F_L`.
    pub fn luminance_adaptation(&self) -> f64 {
        self.derived.f_l
    }

    pub(crate) fn derived(&self) -> &Derived {
        &self.derived
    }

    pub fn signature(&self) -> ViewingSignature {
        ViewingSignature {
            white: self.reference_white.to_bits(),
            adapting_luminance: self.adapting_luminance.to_bits(),
            background_luminance: self.background_luminance.to_bits(),
            surround: self.surround,
        }
    }
}

impl PartialEq for ViewingConditions {
    fn eq(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }
}

impl Eq for ViewingConditions {}

impl Hash for ViewingConditions {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature().hash(state);
    }
}

/// How the background luminance is specified.
#[derive(Debug, Clone, Copy)]
enum Background {
    Luminance(f64),
    Lightness(f64),
}

/// Builder for [`ViewingConditions`].
///
/// The white point is given as a chromaticity (any scale) plus a luminance.
/// Unless set explicitly, the adapting luminance is the white luminance times
/// the background relative luminance.
///
/// ```rust
/// use tonal::{Surround, ViewingConditions};
///
/// let vc = ViewingConditions::builder()
///     .white_luminance(200.0)
///     .background(0.2)
///     .surround(Surround::Average)
///     .build()
///     .unwrap();
/// assert_eq!(vc.adapting_luminance(), 40.0);
/// ```
#[derive(Debug, Clone)]
pub struct ViewingConditionsBuilder {
    white_point: Tristimulus,
    white_luminance: f64,
    background: Background,
    adapting_luminance: Option<f64>,
    surround: Surround,
}

impl Default for ViewingConditionsBuilder {
    fn default() -> Self {
        Self {
            white_point: Illuminant::D65,
            white_luminance: DEFAULT_WHITE_LUMINANCE,
            background: Background::Luminance(DEFAULT_BACKGROUND),
            adapting_luminance: None,
            surround: Surround::Average,
        }
    }
}

impl ViewingConditionsBuilder {
    pub fn white_point(mut self, white_point: Tristimulus) -> Self {
        self.white_point = white_point;
        self
    }

    pub fn white_luminance(mut self, cd_m2: f64) -> Self {
        self.white_luminance = cd_m2;
        self
    }

    /// Background as relative luminance in `(0, 1]`.
    pub fn background(mut self, relative_luminance: f64) -> Self {
        self.background = Background::Luminance(relative_luminance);
        self
    }

    /// Background as CIE L* in `(0, 100]`.
    pub fn background_lightness(mut self, lightness: f64) -> Self {
        self.background = Background::Lightness(lightness);
        self
    }

    pub fn adapting_luminance(mut self, cd_m2: f64) -> Self {
        self.adapting_luminance = Some(cd_m2);
        self
    }

    pub fn surround(mut self, surround: Surround) -> Self {
        self.surround = surround;
        self
    }

    pub fn build(self) -> Result<ViewingConditions> {
        if !positive_finite(self.white_luminance) {
            return Err(ConfigError::InvalidWhiteLuminance(self.white_luminance));
        }
        let wp = self.white_point;
        if !positive_finite(wp.y) {
            return Err(ConfigError::DegenerateWhite {
                x: wp.x,
                y: wp.y,
                z: wp.z,
            });
        }
        let white = wp / wp.y * self.white_luminance;

        let background = match self.background {
            Background::Luminance(y) => y,
            Background::Lightness(l) => {
                if !(l > 0.0 && l <= 100.0) {
                    return Err(ConfigError::InvalidBackgroundLightness(l));
                }
                Lab::new(l, 0.0, 0.0).to_xyz(Illuminant::D65).y / Illuminant::D65.y
            }
        };

        let adapting = self
            .adapting_luminance
            .unwrap_or(self.white_luminance * background);

        ViewingConditions::new(white, adapting, background, self.surround)
    }
}
