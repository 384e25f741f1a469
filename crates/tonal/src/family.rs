//! A family of related palettes grown from one seed.
//!
//! The seed is evaluated once. Each [`PaletteRole`] then applies its own hue
//! rotation and chroma curve:
//!
//! | Role | Hue | Chroma |
//! |------|-----|--------|
//! | primary | seed | seed |
//! | secondary | seed | seed / 3 |
//! | tertiary | seed + 60° | seed / 2 |
//! | neutral | seed | seed / 12 |
//! | neutral-variant | seed | seed / 6 |

use serde::{Deserialize, Serialize};
use tonal_colorspace::{Rgb, Tristimulus};

use crate::error::Result;
use crate::palette::{
    seed_lch, ChromaCurve, PaletteVariant, TonalPalette, TonalPaletteGenerator, Tone,
};
use crate::solver::SolverConfig;
use crate::viewing::ViewingConditions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteRole {
    Primary,
    Secondary,
    Tertiary,
    Neutral,
    NeutralVariant,
}

impl PaletteRole {
    pub const ALL: [PaletteRole; 5] = [
        PaletteRole::Primary,
        PaletteRole::Secondary,
        PaletteRole::Tertiary,
        PaletteRole::Neutral,
        PaletteRole::NeutralVariant,
    ];

    pub fn variant(self) -> PaletteVariant {
        match self {
            PaletteRole::Primary => PaletteVariant::new(0.0, ChromaCurve::Seed),
            PaletteRole::Secondary => PaletteVariant::new(0.0, ChromaCurve::Scaled(1.0 / 3.0)),
            PaletteRole::Tertiary => PaletteVariant::new(60.0, ChromaCurve::Scaled(0.5)),
            PaletteRole::Neutral => PaletteVariant::new(0.0, ChromaCurve::Scaled(1.0 / 12.0)),
            PaletteRole::NeutralVariant => PaletteVariant::new(0.0, ChromaCurve::Scaled(1.0 / 6.0)),
        }
    }
}

/// The five palettes of one seed.
#[derive(Debug, Clone, PartialEq)]
pub struct TonalPalettes {
    pub primary: TonalPalette,
    pub secondary: TonalPalette,
    pub tertiary: TonalPalette,
    pub neutral: TonalPalette,
    pub neutral_variant: TonalPalette,
}

impl TonalPalettes {
    pub fn get(&self, role: PaletteRole) -> &TonalPalette {
        match role {
            PaletteRole::Primary => &self.primary,
            PaletteRole::Secondary => &self.secondary,
            PaletteRole::Tertiary => &self.tertiary,
            PaletteRole::Neutral => &self.neutral,
            PaletteRole::NeutralVariant => &self.neutral_variant,
        }
    }

    /// Color of `role` at `tone`, if the tone was generated.
    pub fn tone(&self, role: PaletteRole, tone: Tone) -> Option<Rgb> {
        self.get(role).tone(tone)
    }

    pub fn seed(&self) -> Tristimulus {
        self.primary.seed()
    }

    pub fn is_degraded(&self) -> bool {
        PaletteRole::ALL.iter().any(|&r| self.get(r).is_degraded())
    }
}

/// Builds [`TonalPalettes`] sharing one tone set and solver configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyGenerator {
    base: TonalPaletteGenerator,
}

impl FamilyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tones(self, tones: Vec<Tone>) -> Result<Self> {
        Ok(Self {
            base: self.base.with_tones(tones)?,
        })
    }

    pub fn with_solver(self, config: SolverConfig) -> Result<Self> {
        Ok(Self {
            base: self.base.with_solver(config)?,
        })
    }

    pub fn tones(&self) -> &[Tone] {
        self.base.tones()
    }

    pub fn generate(&self, seed: Tristimulus, vc: &ViewingConditions) -> TonalPalettes {
        let lch = seed_lch(seed, vc);
        let palette = |role: PaletteRole| {
            self.base
                .clone()
                .with_variant(role.variant())
                .generate_from(seed, lch, vc)
        };
        TonalPalettes {
            primary: palette(PaletteRole::Primary),
            secondary: palette(PaletteRole::Secondary),
            tertiary: palette(PaletteRole::Tertiary),
            neutral: palette(PaletteRole::Neutral),
            neutral_variant: palette(PaletteRole::NeutralVariant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonal_colorspace::math::hue_distance;

    fn family() -> (TonalPalettes, ViewingConditions) {
        let vc = ViewingConditions::builder().build().unwrap();
        let seed = Rgb(66, 133, 244).to_xyz() * vc.white_luminance();
        (FamilyGenerator::new().generate(seed, &vc), vc)
    }

    #[test]
    fn chroma_ratios() {
        let (family, _) = family();
        let seed_c = family.primary.seed_lch().c;
        assert!((family.primary.chroma() - seed_c).abs() < 1e-12);
        assert!((family.secondary.chroma() - seed_c / 3.0).abs() < 1e-12);
        assert!((family.tertiary.chroma() - seed_c / 2.0).abs() < 1e-12);
        assert!((family.neutral.chroma() - seed_c / 12.0).abs() < 1e-12);
        assert!((family.neutral_variant.chroma() - seed_c / 6.0).abs() < 1e-12);
    }

    #[test]
    fn tertiary_is_rotated() {
        let (family, _) = family();
        assert!((hue_distance(family.tertiary.hue(), family.primary.hue()) - 60.0).abs() < 1e-9);
        assert_eq!(family.secondary.hue(), family.primary.hue());
    }

    #[test]
    fn role_lookup() {
        let (family, _) = family();
        let t40 = Tone::new(40).unwrap();
        for role in PaletteRole::ALL {
            assert_eq!(family.tone(role, t40), family.get(role).tone(t40));
        }
        assert_eq!(family.tone(PaletteRole::Primary, t40), family.primary.tone(t40));
        assert!(!family.is_degraded());
    }

    #[test]
    fn same_seed_everywhere() {
        let (family, _) = family();
        for role in PaletteRole::ALL {
            assert_eq!(family.get(role).seed(), family.seed());
            assert_eq!(family.get(role).seed_lch(), family.primary.seed_lch());
        }
    }

    #[test]
    fn neutral_is_less_colorful_than_primary() {
        let (family, _) = family();
        let t50 = Tone::new(50).unwrap();
        let primary = family.primary.entry(t50).unwrap().realized.c;
        let neutral = family.neutral.entry(t50).unwrap().realized.c;
        assert!(neutral < primary);
    }

    #[test]
    fn role_names() {
        let role: PaletteRole = serde_yaml::from_str("neutral-variant").unwrap();
        assert_eq!(role, PaletteRole::NeutralVariant);
    }
}
