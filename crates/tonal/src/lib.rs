//! # Tonal - ZCAM tonal palettes
//!
//! Derives a deterministic family of tonal palettes from a single seed color.
//! The seed is evaluated with the ZCAM color appearance model under explicit
//! [`ViewingConditions`]; each tone is then manufactured by inverting ZCAM at
//! the tone's lightness while keeping the seed's hue and chroma, reducing
//! chroma only when the color would leave the sRGB gamut.
//!
//! ## Quick start
//!
//! ```rust
//! use tonal::{Rgb, Tone, TonalPaletteGenerator, ViewingConditions};
//!
//! // 200 cd/m² display, mid-gray background, average surround
//! let vc = ViewingConditions::builder().build().unwrap();
//! let seed = Rgb(66, 133, 244).to_xyz() * vc.white_luminance();
//!
//! let palette = TonalPaletteGenerator::new().generate(seed, &vc);
//! assert_eq!(palette.entries().len(), 13);
//! assert_eq!(palette.tone(Tone::BLACK), Some(Rgb(0, 0, 0)));
//! assert_eq!(palette.tone(Tone::WHITE), Some(Rgb(255, 255, 255)));
//! ```
//!
//! ## Theming service
//!
//! [`ThemeEngine`] holds the configuration, the active light/dark mode and a
//! cache of palette families:
//!
//! ```rust
//! use tonal::{DarkThemePreference, EngineConfig, PaletteRole, Rgb, ThemeEngine, Tone};
//!
//! let config = EngineConfig {
//!     dark_theme: DarkThemePreference::Off,
//!     ..Default::default()
//! };
//! let engine = ThemeEngine::new(config).unwrap();
//! let family = engine.palettes_for_rgb(Rgb(66, 133, 244));
//! let accent = family.tone(PaletteRole::Primary, Tone::new(40).unwrap());
//! assert!(accent.is_some());
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`viewing`] | Viewing conditions and derived model factors |
//! | [`zcam`] | Forward appearance model |
//! | [`solver`] | Inverse model with gamut mapping |
//! | [`palette`] | Seed → tone table |
//! | [`family`] | Primary/secondary/tertiary/neutral palettes |
//! | [`cache`] | Memoization keyed by seed and viewing conditions |
//! | [`mode`] | Light/dark mode and OS detection |
//! | [`config`] | YAML configuration |
//! | [`engine`] | The theming service |
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (cache activity, degraded tones,
//! clamped targets) and never installs a subscriber.

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod family;
pub mod mode;
pub mod palette;
pub mod solver;
pub mod viewing;
pub mod zcam;

pub use cache::{CacheStats, PaletteCache, PaletteSource};
pub use config::{EngineConfig, ModeViewing};
pub use engine::ThemeEngine;
pub use error::{ConfigError, Result, SolveError};
pub use family::{FamilyGenerator, PaletteRole, TonalPalettes};
pub use mode::{
    detect_color_mode, reset_mode_detector, set_mode_detector, ColorMode, DarkThemePreference,
};
pub use palette::{
    ChromaCurve, PaletteVariant, TonalPalette, TonalPaletteGenerator, Tone, ToneEntry, ToneQuality,
    STANDARD_TONES,
};
pub use solver::{GamutOutcome, Solution, SolverConfig, ZcamSolver};
pub use viewing::{Surround, ViewingConditions, ViewingConditionsBuilder, ViewingSignature};
pub use zcam::{ZcamCorrelates, ZcamLch};

pub use tonal_colorspace::{Jzazbz, Jzczhz, Rgb, Tristimulus};
