//! Tonal palettes: one seed color, many lightness stops.
//!
//! [`TonalPaletteGenerator`] evaluates the seed once with the forward model,
//! then asks the inverse solver for one color per [`Tone`], keeping the seed
//! hue and (a function of) the seed chroma. Tone values map one-to-one onto
//! ZCAM lightness: tone 0 is black, tone 100 is the reference white.
//!
//! Generation never fails. A tone the solver cannot reach falls back to the
//! nearest solved tone's hue at half its chroma and is marked
//! [`ToneQuality::Degraded`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tonal_colorspace::math::normalize_hue;
use tonal_colorspace::{Jzazbz, Rgb, Tristimulus};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result, SolveError};
use crate::solver::{GamutOutcome, Solution, SolverConfig, ZcamSolver};
use crate::viewing::ViewingConditions;
use crate::zcam::{ZcamCorrelates, ZcamLch};

/// The standard lightness stops.
pub const STANDARD_TONES: [u8; 13] = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 95, 99, 100];

/// Chroma kept by a degraded tone relative to its nearest solved neighbour.
const DEGRADED_CHROMA_FACTOR: f64 = 0.5;

type Solved = (Tone, ZcamLch, std::result::Result<Solution, SolveError>);

/// A lightness stop, `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Tone(u8);

impl Tone {
    pub const BLACK: Tone = Tone(0);
    pub const WHITE: Tone = Tone(100);

    pub fn new(value: u32) -> Result<Self> {
        if value > 100 {
            return Err(ConfigError::InvalidTone(value));
        }
        Ok(Tone(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Target ZCAM lightness for this tone.
    pub fn lightness(self) -> f64 {
        self.0 as f64
    }

    pub fn standard() -> Vec<Tone> {
        STANDARD_TONES.iter().map(|&t| Tone(t)).collect()
    }
}

impl TryFrom<u32> for Tone {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self> {
        Tone::new(value)
    }
}

impl From<Tone> for u32 {
    fn from(tone: Tone) -> u32 {
        tone.0 as u32
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How faithfully a tone realizes its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToneQuality {
    /// Requested lightness, chroma and hue.
    Exact,
    /// Requested lightness and hue, chroma reduced to fit the gamut.
    ChromaReduced,
    /// Requested lightness, chroma clamped to zero.
    Neutral,
    /// The solver did not converge; a fallback color was used.
    Degraded,
}

impl From<GamutOutcome> for ToneQuality {
    fn from(outcome: GamutOutcome) -> Self {
        match outcome {
            GamutOutcome::InGamut => ToneQuality::Exact,
            GamutOutcome::ChromaReduced => ToneQuality::ChromaReduced,
            GamutOutcome::Neutral => ToneQuality::Neutral,
        }
    }
}

/// Chroma requested for every tone, as a function of the seed chroma.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChromaCurve {
    /// The seed chroma.
    #[default]
    Seed,
    /// The seed chroma times a factor.
    Scaled(f64),
    /// A fixed chroma regardless of the seed.
    Fixed(f64),
    /// The seed chroma, raised to at least the given value.
    AtLeast(f64),
}

impl ChromaCurve {
    /// Requested chroma for a seed. Never negative; non-finite results
    /// become 0.
    pub fn apply(self, seed_chroma: f64) -> f64 {
        let chroma = match self {
            ChromaCurve::Seed => seed_chroma,
            ChromaCurve::Scaled(factor) => seed_chroma * factor,
            ChromaCurve::Fixed(chroma) => chroma,
            ChromaCurve::AtLeast(floor) => seed_chroma.max(floor),
        };
        if chroma.is_finite() {
            chroma.max(0.0)
        } else {
            0.0
        }
    }
}

/// Hue rotation and chroma curve applied to the seed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaletteVariant {
    /// Degrees added to the seed hue.
    pub hue_shift: f64,
    pub chroma: ChromaCurve,
}

impl PaletteVariant {
    pub const fn new(hue_shift: f64, chroma: ChromaCurve) -> Self {
        Self { hue_shift, chroma }
    }
}

/// One realized tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneEntry {
    pub tone: Tone,
    pub requested: ZcamLch,
    /// Lightness, chroma and hue measured on the realized color.
    pub realized: ZcamLch,
    /// Absolute XYZ (cd/m²).
    pub xyz: Tristimulus,
    pub rgb: Rgb,
    pub quality: ToneQuality,
}

impl ToneEntry {
    fn new(
        tone: Tone,
        requested: ZcamLch,
        solution: &Solution,
        quality: ToneQuality,
        vc: &ViewingConditions,
    ) -> Self {
        ToneEntry {
            tone,
            requested,
            realized: solution.realized,
            xyz: solution.xyz,
            rgb: Rgb::from_xyz(solution.xyz / vc.white_luminance()),
            quality,
        }
    }
}

/// An ordered tone → color table derived from one seed.
#[derive(Debug, Clone, PartialEq)]
pub struct TonalPalette {
    seed: Tristimulus,
    seed_lch: ZcamLch,
    hue: f64,
    chroma: f64,
    entries: Vec<ToneEntry>,
}

impl TonalPalette {
    /// Seed color, absolute XYZ.
    pub fn seed(&self) -> Tristimulus {
        self.seed
    }

    pub fn seed_lch(&self) -> ZcamLch {
        self.seed_lch
    }

    /// Hue requested for every tone.
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// Chroma requested for every tone.
    pub fn chroma(&self) -> f64 {
        self.chroma
    }

    /// Entries in ascending tone order.
    pub fn entries(&self) -> &[ToneEntry] {
        &self.entries
    }

    pub fn entry(&self, tone: Tone) -> Option<&ToneEntry> {
        self.entries
            .binary_search_by_key(&tone, |e| e.tone)
            .ok()
            .map(|i| &self.entries[i])
    }

    pub fn tone(&self, tone: Tone) -> Option<Rgb> {
        self.entry(tone).map(|e| e.rgb)
    }

    pub fn is_degraded(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.quality == ToneQuality::Degraded)
    }

    /// Perceptual difference (Jzazbz `dE`) between two realized tones.
    pub fn distance(&self, a: Tone, b: Tone) -> Option<f64> {
        let a = Jzazbz::from_xyz_abs(self.entry(a)?.xyz).to_jzczhz();
        let b = Jzazbz::from_xyz_abs(self.entry(b)?.xyz).to_jzczhz();
        Some(a.de(&b))
    }
}

/// Builds [`TonalPalette`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct TonalPaletteGenerator {
    tones: Vec<Tone>,
    solver: SolverConfig,
    variant: PaletteVariant,
}

impl Default for TonalPaletteGenerator {
    fn default() -> Self {
        Self {
            tones: Tone::standard(),
            solver: SolverConfig::default(),
            variant: PaletteVariant::default(),
        }
    }
}

impl TonalPaletteGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tone set. Tones are sorted and deduplicated.
    pub fn with_tones(mut self, mut tones: Vec<Tone>) -> Result<Self> {
        if tones.is_empty() {
            return Err(ConfigError::EmptyTones);
        }
        tones.sort();
        tones.dedup();
        self.tones = tones;
        Ok(self)
    }

    pub fn with_solver(mut self, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        self.solver = config;
        Ok(self)
    }

    pub fn with_variant(mut self, variant: PaletteVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn solver_config(&self) -> &SolverConfig {
        &self.solver
    }

    pub fn variant(&self) -> PaletteVariant {
        self.variant
    }

    /// Generates a palette from an absolute XYZ seed.
    pub fn generate(&self, seed: Tristimulus, vc: &ViewingConditions) -> TonalPalette {
        self.generate_from(seed, seed_lch(seed, vc), vc)
    }

    /// Generates a palette from an already evaluated seed.
    pub(crate) fn generate_from(
        &self,
        seed: Tristimulus,
        seed_lch: ZcamLch,
        vc: &ViewingConditions,
    ) -> TonalPalette {
        let hue = normalize_hue(seed_lch.h + self.variant.hue_shift);
        let chroma = self.variant.chroma.apply(seed_lch.c);
        let solver = ZcamSolver::new(vc, self.solver);

        let solved: Vec<Solved> = self
            .tones
            .iter()
            .map(|&tone| {
                let requested = ZcamLch::new(tone.lightness(), chroma, hue);
                (tone, requested, solver.solve(requested))
            })
            .collect();

        let entries: Vec<ToneEntry> = solved
            .iter()
            .map(|(tone, requested, result)| match result {
                Ok(solution) => {
                    ToneEntry::new(*tone, *requested, solution, solution.gamut.into(), vc)
                }
                Err(err) => {
                    warn!(tone = tone.value(), error = %err, "tone degraded");
                    let fallback = fallback(&solver, &solved, *tone, hue, err);
                    ToneEntry::new(*tone, *requested, &fallback, ToneQuality::Degraded, vc)
                }
            })
            .collect();

        let degraded = entries
            .iter()
            .filter(|e| e.quality == ToneQuality::Degraded)
            .count();
        debug!(hue, chroma, tones = entries.len(), degraded, "generated tonal palette");

        TonalPalette {
            seed,
            seed_lch,
            hue,
            chroma,
            entries,
        }
    }
}

/// Forward-evaluates a seed. Non-finite seeds are treated as neutral.
pub(crate) fn seed_lch(seed: Tristimulus, vc: &ViewingConditions) -> ZcamLch {
    let lch = ZcamCorrelates::from_xyz(seed, vc).to_lch();
    if lch.is_finite() {
        lch
    } else {
        warn!(?seed, "seed has no finite appearance, using neutral");
        ZcamLch::new(0.0, 0.0, 0.0)
    }
}

/// Color for a tone the solver could not reach: the nearest solved tone's
/// hue at reduced chroma, realized at the best lightness estimate.
fn fallback(
    solver: &ZcamSolver<'_>,
    solved: &[Solved],
    tone: Tone,
    hue: f64,
    err: &SolveError,
) -> Solution {
    let nearest = solved
        .iter()
        .filter_map(|(t, _, r)| r.as_ref().ok().map(|s| (*t, s)))
        .min_by_key(|(t, _)| t.value().abs_diff(tone.value()));

    let (hue, chroma) = match nearest {
        Some((_, s)) if s.realized.c > 0.0 => {
            (s.realized.h, s.realized.c * DEGRADED_CHROMA_FACTOR)
        }
        _ => (hue, 0.0),
    };
    let iz = match err {
        SolveError::NotConverged { best_iz, .. } => *best_iz,
        SolveError::InvalidTarget { .. } => 0.0,
    };
    solver.realize(iz, chroma, hue)
}
