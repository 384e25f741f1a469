//! Light/dark mode resolution.
//!
//! Each mode has its own viewing conditions (a dark UI is viewed against a
//! darker background and surround), so the active mode decides which palette
//! set the engine serves.
//!
//! The user preference [`DarkThemePreference::FollowDevice`] asks the OS via
//! the `dark-light` crate. Use [`set_mode_detector`] to override detection in
//! tests:
//!
//! ```rust
//! use tonal::{detect_color_mode, reset_mode_detector, set_mode_detector, ColorMode};
//!
//! set_mode_detector(|| ColorMode::Dark);
//! assert_eq!(detect_color_mode(), ColorMode::Dark);
//! reset_mode_detector();
//! ```

use std::sync::{Mutex, PoisonError};

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

/// Whether the dark theme is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DarkThemePreference {
    /// Follow the OS setting.
    #[default]
    FollowDevice,
    On,
    Off,
}

impl DarkThemePreference {
    pub fn resolve(self) -> ColorMode {
        match self {
            DarkThemePreference::FollowDevice => detect_color_mode(),
            DarkThemePreference::On => ColorMode::Dark,
            DarkThemePreference::Off => ColorMode::Light,
        }
    }
}

type ModeDetector = fn() -> ColorMode;

static MODE_DETECTOR: Lazy<Mutex<ModeDetector>> = Lazy::new(|| Mutex::new(os_mode_detector));

/// Overrides the detector used for [`DarkThemePreference::FollowDevice`].
pub fn set_mode_detector(detector: ModeDetector) {
    let mut guard = MODE_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Restores OS detection.
pub fn reset_mode_detector() {
    set_mode_detector(os_mode_detector);
}

/// Detects the device color mode with the configured detector.
pub fn detect_color_mode() -> ColorMode {
    let detector = MODE_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    (*detector)()
}

fn os_mode_detector() -> ColorMode {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => ColorMode::Dark,
        Ok(OsThemeMode::Light) | Ok(OsThemeMode::Unspecified) => ColorMode::Light,
        Err(err) => {
            debug!(error = %err, "OS theme detection failed, assuming light");
            ColorMode::Light
        }
    }
}
