//! The theming service.
//!
//! [`ThemeEngine`] owns the configuration, the active color mode with its
//! viewing conditions, and a cache of palette families. Switching mode
//! rebuilds the viewing conditions and drops palettes computed under the old
//! ones; palettes for the new mode are generated on first use.

use std::sync::Arc;

use tonal_colorspace::{Rgb, Tristimulus};
use tracing::debug;

use crate::cache::PaletteCache;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::family::{FamilyGenerator, TonalPalettes};
use crate::mode::{ColorMode, DarkThemePreference};
use crate::viewing::ViewingConditions;

#[derive(Debug)]
pub struct ThemeEngine {
    config: EngineConfig,
    mode: ColorMode,
    viewing: ViewingConditions,
    cache: PaletteCache<FamilyGenerator>,
}

impl ThemeEngine {
    /// Validates `config` and activates the mode its dark-theme preference
    /// resolves to.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mode = config.dark_theme.resolve();
        let viewing = config.viewing_conditions(mode)?;
        let cache = PaletteCache::with_capacity(config.generator()?, config.cache_capacity)?;
        debug!(?mode, "theme engine ready");
        Ok(Self {
            config,
            mode,
            viewing,
            cache,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn viewing_conditions(&self) -> &ViewingConditions {
        &self.viewing
    }

    pub fn cache(&self) -> &PaletteCache<FamilyGenerator> {
        &self.cache
    }

    /// Switches to `mode`. Returns whether the viewing conditions changed.
    pub fn activate(&mut self, mode: ColorMode) -> Result<bool> {
        let viewing = self.config.viewing_conditions(mode)?;
        self.mode = mode;
        if viewing == self.viewing {
            return Ok(false);
        }
        let removed = self.cache.invalidate(&viewing);
        debug!(?mode, removed, "viewing conditions changed");
        self.viewing = viewing;
        Ok(true)
    }

    /// Re-resolves the dark-theme preference, e.g. after the OS theme changed.
    pub fn refresh(&mut self) -> Result<bool> {
        self.activate(self.config.dark_theme.resolve())
    }

    pub fn set_dark_theme(&mut self, preference: DarkThemePreference) -> Result<bool> {
        self.config.dark_theme = preference;
        self.refresh()
    }

    /// Absolute XYZ of an sRGB seed on this display.
    pub fn seed_xyz(&self, rgb: Rgb) -> Tristimulus {
        rgb.to_xyz() * self.viewing.white_luminance()
    }

    /// Palette family for an absolute XYZ seed under the active conditions.
    pub fn palettes(&self, seed: Tristimulus) -> Arc<TonalPalettes> {
        self.cache.get(seed, &self.viewing)
    }

    pub fn palettes_for_rgb(&self, rgb: Rgb) -> Arc<TonalPalettes> {
        self.palettes(self.seed_xyz(rgb))
    }

    /// Palette family for a `#rrggbb` or `#rgb` seed.
    pub fn palettes_for_hex(&self, hex: &str) -> Result<Arc<TonalPalettes>> {
        let rgb = Rgb::from_hex(hex)?;
        Ok(self.palettes_for_rgb(rgb))
    }

    /// Palette family of the configured seed at `index`. An index past the
    /// end selects the first seed.
    pub fn seed_palettes(&self, index: usize) -> Option<Arc<TonalPalettes>> {
        let seeds = &self.config.seeds;
        let rgb = seeds.get(index).or_else(|| seeds.first())?;
        Some(self.palettes_for_rgb(*rgb))
    }

    /// Generates and caches palettes for `seeds` ahead of use.
    pub fn prepare(&self, seeds: &[Rgb]) {
        for &rgb in seeds {
            self.palettes_for_rgb(rgb);
        }
        debug!(count = seeds.len(), "palettes prepared");
    }
}
