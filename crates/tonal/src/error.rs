//! Error types for the palette engine.
//!
//! Two families of failure exist:
//!
//! - [`ConfigError`]: invalid viewing conditions or configuration. These are
//!   fatal to a theme activation and are returned to the caller.
//! - [`SolveError`]: the inverse solver could not hit a lightness target.
//!   These never leave the palette generator, which recovers locally and
//!   marks the affected tone as degraded.

use std::path::PathBuf;

use thiserror::Error;
use tonal_colorspace::ParseColorError;

/// Errors raised while building viewing conditions or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Adapting luminance is zero, negative or not a number.
    #[error("adapting luminance must be a positive finite value in cd/m², got {0}")]
    InvalidAdaptingLuminance(f64),

    /// Background relative luminance outside `(0, 1]`.
    #[error("background luminance must be within (0, 1], got {0}")]
    InvalidBackground(f64),

    /// Background lightness outside `(0, 100]`.
    #[error("background lightness must be within (0, 100], got {0}")]
    InvalidBackgroundLightness(f64),

    /// Both a background luminance and a background lightness were given.
    #[error("background and background_lightness are mutually exclusive")]
    ConflictingBackground,

    /// White luminance is zero, negative or not a number.
    #[error("white luminance must be a positive finite value in cd/m², got {0}")]
    InvalidWhiteLuminance(f64),

    /// Reference white with a non-positive or non-finite component, or one
    /// that produces no cone response.
    #[error("degenerate reference white ({x}, {y}, {z})")]
    DegenerateWhite { x: f64, y: f64, z: f64 },

    /// Tone outside `0..=100`.
    #[error("tone {0} is outside 0..=100")]
    InvalidTone(u32),

    /// A palette needs at least one tone.
    #[error("tone list must not be empty")]
    EmptyTones,

    /// Solver settings that would never terminate or never converge.
    #[error("invalid solver setting: {0}")]
    InvalidSolver(String),

    /// Cache capacity of zero.
    #[error("cache capacity must be at least 1")]
    InvalidCacheCapacity,

    /// A seed color string could not be parsed.
    #[error(transparent)]
    InvalidColor(#[from] ParseColorError),

    /// YAML parse error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the inverse ZCAM solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The requested lightness, chroma or hue is not a number.
    #[error("solve target ({l}, {c}, {h}) is not a number")]
    InvalidTarget { l: f64, c: f64, h: f64 },

    /// Bisection ran out of iterations before matching the target lightness.
    #[error(
        "lightness {target} not reached after {iterations} iterations (closest {reached})"
    )]
    NotConverged {
        target: f64,
        reached: f64,
        iterations: u32,
        /// Achromatic signal of the closest estimate.
        best_iz: f64,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidBackground(1.5);
        assert!(err.to_string().contains("1.5"));

        let err = ConfigError::DegenerateWhite {
            x: 0.0,
            y: 1.0,
            z: 1.0,
        };
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn load_error_mentions_path() {
        let err = ConfigError::Load {
            path: PathBuf::from("/nope/theme.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope/theme.yaml"));
        assert!(msg.contains("missing"));
    }

    #[test]
    fn from_parse_color_error() {
        let parse_err = tonal_colorspace::Rgb::from_hex("#zzz").unwrap_err();
        let err: ConfigError = parse_err.into();
        assert!(matches!(err, ConfigError::InvalidColor(_)));
    }

    #[test]
    fn solve_error_display() {
        let err = SolveError::NotConverged {
            target: 50.0,
            reached: 49.0,
            iterations: 2,
            best_iz: 0.1,
        };
        assert!(err.to_string().contains("2 iterations"));
    }
}
