//! # Tonal Colorspace - color space primitives
//!
//! The numeric foundation of the `tonal` palette engine. Every type here is an
//! immutable `Copy` value and every conversion is a pure function, so the
//! crate is safe to use from any thread.
//!
//! ## Spaces
//!
//! | Module | Types | Notes |
//! |--------|-------|-------|
//! | [`xyz`] | [`Tristimulus`], [`Illuminant`] | CIE 1931 XYZ, luminance scaling |
//! | [`lab`] | [`Lab`], [`Lch`] | CIE 1976, relative to a reference white |
//! | [`jzazbz`] | [`Jzazbz`], [`Jzczhz`] | HDR-capable, perceptual difference `dE` |
//! | [`rgb`] | [`Rgb`] | 8-bit sRGB display colors |
//!
//! ## Example
//!
//! ```rust
//! use tonal_colorspace::{Jzazbz, Rgb};
//!
//! // Absolute XYZ for a display whose white is 200 cd/m²
//! let blue = Jzazbz::from_xyz_abs(Rgb(66, 133, 244).to_xyz() * 200.0).to_jzczhz();
//! let navy = Jzazbz::from_xyz_abs(Rgb(20, 40, 110).to_xyz() * 200.0).to_jzczhz();
//!
//! assert!(blue.de(&navy) > 0.0);
//! assert_eq!(blue.de(&blue), 0.0);
//! ```

pub mod jzazbz;
pub mod lab;
pub mod math;
pub mod rgb;
pub mod xyz;

pub use jzazbz::{Jzazbz, Jzczhz};
pub use lab::{Lab, Lch};
pub use math::Matrix3;
pub use rgb::{ParseColorError, Rgb};
pub use xyz::{Illuminant, Tristimulus};
