//! Engine configuration.
//!
//! [`EngineConfig`] is plain data, loaded from YAML and validated once. Every
//! field has a default, so a config file only needs the values it changes:
//!
//! ```yaml
//! dark_theme: follow-device   # follow-device | on | off
//! white_luminance: 200.0      # cd/m²
//! light:
//!   surround: average
//!   background: 0.2           # relative luminance
//! dark:
//!   surround: dim
//!   background_lightness: 30  # or as CIE L*
//! tones: [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 99, 100]
//! solver:
//!   max_iterations: 40
//!   tolerance: 0.0001
//!   chroma_step: 0.8
//! cache_capacity: 8
//! seeds: ["#4285f4"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tonal_colorspace::Rgb;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{ConfigError, Result};
use crate::family::FamilyGenerator;
use crate::mode::{ColorMode, DarkThemePreference};
use crate::palette::Tone;
use crate::solver::SolverConfig;
use crate::viewing::{Surround, ViewingConditions, DEFAULT_WHITE_LUMINANCE};

/// Viewing environment for one color mode.
///
/// With neither `background` nor `background_lightness` set, the background
/// relative luminance is 0.2. The adapting luminance defaults to the white
/// luminance times the background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeViewing {
    pub surround: Surround,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_lightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adapting_luminance: Option<f64>,
}

impl ModeViewing {
    pub fn light() -> Self {
        Self {
            surround: Surround::Average,
            background: Some(0.2),
            ..Default::default()
        }
    }

    pub fn dark() -> Self {
        Self {
            surround: Surround::Dim,
            background: Some(0.1),
            ..Default::default()
        }
    }

    fn build(&self, white_luminance: f64) -> Result<ViewingConditions> {
        let mut builder = ViewingConditions::builder()
            .white_luminance(white_luminance)
            .surround(self.surround);
        builder = match (self.background, self.background_lightness) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingBackground),
            (Some(y), None) => builder.background(y),
            (None, Some(l)) => builder.background_lightness(l),
            (None, None) => builder,
        };
        if let Some(la) = self.adapting_luminance {
            builder = builder.adapting_luminance(la);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub dark_theme: DarkThemePreference,
    /// Display white, in cd/m².
    pub white_luminance: f64,
    pub light: ModeViewing,
    pub dark: ModeViewing,
    pub tones: Vec<Tone>,
    pub solver: SolverConfig,
    pub cache_capacity: usize,
    /// Seed colors offered to the user, in preference order.
    pub seeds: Vec<Rgb>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dark_theme: DarkThemePreference::FollowDevice,
            white_luminance: DEFAULT_WHITE_LUMINANCE,
            light: ModeViewing::light(),
            dark: ModeViewing::dark(),
            tones: Tone::standard(),
            solver: SolverConfig::default(),
            cache_capacity: DEFAULT_CAPACITY,
            seeds: vec![Rgb(0x42, 0x85, 0xf4)],
        }
    }
}

impl EngineConfig {
    /// Parses and validates a YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tones.is_empty() {
            return Err(ConfigError::EmptyTones);
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity);
        }
        self.solver.validate()?;
        self.viewing_conditions(ColorMode::Light)?;
        self.viewing_conditions(ColorMode::Dark)?;
        Ok(())
    }

    pub fn mode_viewing(&self, mode: ColorMode) -> &ModeViewing {
        match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        }
    }

    /// Viewing conditions for `mode`.
    pub fn viewing_conditions(&self, mode: ColorMode) -> Result<ViewingConditions> {
        self.mode_viewing(mode).build(self.white_luminance)
    }

    /// Palette family generator with the configured tones and solver.
    pub fn generator(&self) -> Result<FamilyGenerator> {
        FamilyGenerator::new()
            .with_tones(self.tones.clone())?
            .with_solver(self.solver)
    }
}
