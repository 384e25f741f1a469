//! 8-bit sRGB display colors and the linear-sRGB ↔ XYZ bridge.
//!
//! [`Rgb`] is the device color that palettes are realized in. XYZ values
//! produced and consumed here are *relative*: the sRGB white `#ffffff` maps to
//! D65 with `Y = 1`. Scale by the display's white luminance to get absolute
//! values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::math::Matrix3;
use crate::xyz::Tristimulus;

/// Linear sRGB → XYZ (D65).
///
/// Built from the sRGB primaries and the D65 chromaticity `(0.3127, 0.3290)`,
/// so the rows sum to [`Illuminant::D65`](crate::Illuminant::D65) and every
/// gray lies exactly on the white axis.
pub const SRGB_TO_XYZ: Matrix3 = Matrix3([
    [0.4123907992659595, 0.35758433938387796, 0.1804807884018343],
    [0.21263900587151036, 0.7151686787677559, 0.07219231536073371],
    [0.01933081871559185, 0.11919477979462599, 0.9505321522496606],
]);

/// XYZ (D65) → linear sRGB.
pub const XYZ_TO_SRGB: Matrix3 = Matrix3([
    [3.2409699419045213, -1.5373831775700935, -0.4986107602930033],
    [-0.9692436362808798, 1.8759675015077206, 0.04155505740717561],
    [0.05563007969699361, -0.20397695888897657, 1.0569715142428786],
]);

/// An sRGB color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    input: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid hex color '{}' (expected #rgb or #rrggbb)",
            self.input
        )
    }
}

impl std::error::Error for ParseColorError {}

/// Converts an sRGB component (0–255) to linear light (0.0–1.0).
pub fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts a linear light value (0.0–1.0) to sRGB (0–255), clamped.
pub fn linear_to_srgb(c: f64) -> u8 {
    let c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
    let s = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

/// Relative XYZ to linear sRGB. Channels may fall outside `[0, 1]`.
pub fn xyz_to_linear_srgb(xyz: Tristimulus) -> [f64; 3] {
    XYZ_TO_SRGB.mul_vec(xyz.to_array())
}

/// Returns `true` when every channel lies in `[-tolerance, 1 + tolerance]`.
///
/// Non-finite channels are never in gamut.
pub fn in_gamut(linear: [f64; 3], tolerance: f64) -> bool {
    linear
        .iter()
        .all(|c| (-tolerance..=1.0 + tolerance).contains(c))
}

impl Rgb {
    /// Parses `#rrggbb` or `#rgb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self, ParseColorError> {
        let err = || ParseColorError {
            input: s.to_string(),
        };
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| err())
        };
        match hex.len() {
            // #rgb -> #rrggbb
            3 => Ok(Rgb(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
            )),
            6 => Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(err()),
        }
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_linear(self) -> [f64; 3] {
        [
            srgb_to_linear(self.0),
            srgb_to_linear(self.1),
            srgb_to_linear(self.2),
        ]
    }

    /// Quantizes linear sRGB, clamping out-of-range channels.
    pub fn from_linear(linear: [f64; 3]) -> Self {
        Rgb(
            linear_to_srgb(linear[0]),
            linear_to_srgb(linear[1]),
            linear_to_srgb(linear[2]),
        )
    }

    /// Relative XYZ (white has `Y = 1`).
    pub fn to_xyz(self) -> Tristimulus {
        Tristimulus::from_array(SRGB_TO_XYZ.mul_vec(self.to_linear()))
    }

    /// Nearest sRGB color for a relative XYZ value.
    pub fn from_xyz(xyz: Tristimulus) -> Self {
        Self::from_linear(xyz_to_linear_srgb(xyz))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xyz::Illuminant;

    fn assert_rgb_roundtrip(rgb: Rgb) {
        let back = Rgb::from_xyz(rgb.to_xyz());
        assert_eq!(rgb, back, "round-trip failed via {:?}", rgb.to_xyz());
    }

    #[test]
    fn roundtrip_primaries_and_grays() {
        for rgb in [
            Rgb(0, 0, 0),
            Rgb(255, 255, 255),
            Rgb(255, 0, 0),
            Rgb(0, 255, 0),
            Rgb(0, 0, 255),
            Rgb(128, 128, 128),
            Rgb(66, 133, 244),
        ] {
            assert_rgb_roundtrip(rgb);
        }
    }

    #[test]
    fn white_is_d65() {
        let white = Rgb(255, 255, 255).to_xyz();
        assert!((white.x - Illuminant::D65.x).abs() < 1e-15);
        assert!((white.y - Illuminant::D65.y).abs() < 1e-15);
        assert!((white.z - Illuminant::D65.z).abs() < 1e-15);
    }

    #[test]
    fn grays_lie_on_white_axis() {
        let w = Illuminant::D65;
        for v in [1, 64, 128, 200, 255] {
            let gray = Rgb(v, v, v).to_xyz();
            let k = gray.y;
            assert!((gray.x - k * w.x).abs() <= 1e-14, "gray {}", v);
            assert!((gray.z - k * w.z).abs() <= 1e-14, "gray {}", v);
        }
    }

    #[test]
    fn matrices_are_inverse() {
        let product = SRGB_TO_XYZ.mul(&XYZ_TO_SRGB);
        for (i, row) in product.0.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((v - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn parse_six_digit_hex() {
        assert_eq!(Rgb::from_hex("#4285f4").unwrap(), Rgb(66, 133, 244));
        assert_eq!(Rgb::from_hex("4285F4").unwrap(), Rgb(66, 133, 244));
    }

    #[test]
    fn parse_three_digit_hex() {
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb(255, 255, 255));
        assert_eq!(Rgb::from_hex("#a0c").unwrap(), Rgb(170, 0, 204));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn hex_display_roundtrip() {
        let rgb = Rgb(1, 2, 254);
        assert_eq!(rgb.to_string(), "#0102fe");
        assert_eq!("#0102fe".parse::<Rgb>().unwrap(), rgb);
    }

    #[test]
    fn gamut_check() {
        assert!(in_gamut([0.0, 0.5, 1.0], 0.0));
        assert!(!in_gamut([-0.01, 0.5, 1.0], 1e-4));
        assert!(!in_gamut([0.0, 0.5, 1.01], 1e-4));
        assert!(!in_gamut([f64::NAN, 0.5, 0.5], 1e-4));
        assert!(in_gamut([-1e-6, 0.5, 1.0 + 1e-6], 1e-4));
    }

    #[test]
    fn from_linear_clamps() {
        assert_eq!(Rgb::from_linear([-0.5, 2.0, f64::NAN]), Rgb(0, 255, 0));
    }
}
