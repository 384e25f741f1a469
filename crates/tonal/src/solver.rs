//! Inverse ZCAM: manufacture a color from a lightness/chroma/hue target.
//!
//! Lightness depends only on the achromatic signal `Iz`, so the solver first
//! bisects `Iz` until the forward lightness matches the target. With `Iz`
//! fixed, chroma and hue give the opponent signals in closed form and the
//! remaining stages (opponent matrix, perceptual quantizer, cone matrix) are
//! inverted exactly.
//!
//! The resulting color may fall outside the sRGB gamut. Chroma is then backed
//! off geometrically and the gamut boundary refined by bisection. Hue is
//! never adjusted: a tone either keeps the requested hue or becomes neutral.

use serde::{Deserialize, Serialize};
use tonal_colorspace::math::to_radians;
use tonal_colorspace::rgb::{in_gamut, xyz_to_linear_srgb};
use tonal_colorspace::Tristimulus;
use tracing::{trace, warn};

use crate::error::{ConfigError, SolveError};
use crate::viewing::ViewingConditions;
use crate::zcam::{self, ZcamCorrelates, ZcamLch};

/// How many times the upper bracket may double when the target lies above
/// the reference white's signal.
const MAX_BRACKET_EXPANSIONS: u32 = 16;

/// Upper bound on chroma back-off steps before giving up on chroma.
const MAX_CHROMA_STEPS: u32 = 1024;

/// Tunables for [`ZcamSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Bisection steps allowed for the lightness match.
    pub max_iterations: u32,
    /// Accepted lightness error on the Jz scale.
    pub tolerance: f64,
    /// Multiplicative chroma reduction per back-off step, in `(0, 1)`.
    pub chroma_step: f64,
    /// Below this chroma a tone collapses to neutral gray.
    pub min_chroma: f64,
    /// Bisection steps used to refine the gamut boundary.
    pub refine_steps: u32,
    /// Slack allowed on each linear sRGB channel.
    pub gamut_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 40,
            tolerance: 1e-4,
            chroma_step: 0.8,
            min_chroma: 0.05,
            refine_steps: 12,
            gamut_tolerance: 1e-5,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::InvalidSolver(msg));
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".into());
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return invalid(format!("tolerance must be positive, got {}", self.tolerance));
        }
        if !(self.chroma_step > 0.0 && self.chroma_step < 1.0) {
            return invalid(format!(
                "chroma_step must be within (0, 1), got {}",
                self.chroma_step
            ));
        }
        if !(self.min_chroma.is_finite() && self.min_chroma > 0.0) {
            return invalid(format!("min_chroma must be positive, got {}", self.min_chroma));
        }
        if !(self.gamut_tolerance.is_finite() && self.gamut_tolerance >= 0.0) {
            return invalid(format!(
                "gamut_tolerance must not be negative, got {}",
                self.gamut_tolerance
            ));
        }
        Ok(())
    }
}

/// What happened to the requested chroma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamutOutcome {
    /// The requested chroma was realizable.
    InGamut,
    /// Chroma was reduced to the gamut boundary.
    ChromaReduced,
    /// No chroma was realizable; the color is a neutral gray.
    Neutral,
}

/// A realized color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Absolute XYZ (cd/m²).
    pub xyz: Tristimulus,
    /// Lightness, chroma and hue measured on the realized color.
    pub realized: ZcamLch,
    /// Achromatic signal used.
    pub iz: f64,
    /// Bisection steps spent on lightness.
    pub iterations: u32,
    pub gamut: GamutOutcome,
}

/// Inverse ZCAM solver bound to one set of viewing conditions.
#[derive(Debug, Clone, Copy)]
pub struct ZcamSolver<'a> {
    vc: &'a ViewingConditions,
    config: SolverConfig,
}

impl<'a> ZcamSolver<'a> {
    pub fn new(vc: &'a ViewingConditions, config: SolverConfig) -> Self {
        Self { vc, config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds the in-gamut color closest to `target`.
    ///
    /// Lightness is clamped into `[0, 100]`. Negative chroma is treated as
    /// zero. Hue is taken modulo 360. Non-finite targets are rejected.
    pub fn solve(&self, target: ZcamLch) -> Result<Solution, SolveError> {
        if !target.is_finite() {
            return Err(SolveError::InvalidTarget {
                l: target.l,
                c: target.c,
                h: target.h,
            });
        }
        let lightness = target.l.clamp(0.0, 100.0);
        if lightness != target.l {
            warn!(requested = target.l, clamped = lightness, "lightness target out of range");
        }

        let (iz, iterations) = self.solve_lightness(lightness)?;
        let mut solution = self.realize(iz, target.c.max(0.0), target.h);
        solution.iterations = iterations;
        Ok(solution)
    }

    /// Bisects the achromatic signal until its lightness matches `target`.
    ///
    /// Returns the signal and the number of steps taken. The bisection runs
    /// until the bracket collapses or the budget is spent, then checks the
    /// match against the configured tolerance.
    pub fn solve_lightness(&self, target: f64) -> Result<(f64, u32), SolveError> {
        if target <= 0.0 {
            return Ok((0.0, 0));
        }

        let mut lo = 0.0;
        let mut hi = self.vc.white_iz();
        let mut expansions = 0;
        while zcam::lightness(hi, self.vc) < target && expansions < MAX_BRACKET_EXPANSIONS {
            lo = hi;
            hi *= 2.0;
            expansions += 1;
        }

        let mut iterations = 0;
        let mut best = 0.5 * (lo + hi);
        let mut reached = zcam::lightness(best, self.vc);
        while iterations < self.config.max_iterations {
            best = 0.5 * (lo + hi);
            reached = zcam::lightness(best, self.vc);
            iterations += 1;
            if reached == target || best <= lo || best >= hi {
                break;
            }
            if reached < target {
                lo = best;
            } else {
                hi = best;
            }
        }

        trace!(target, reached, iz = best, iterations, "lightness bisection");
        if (reached - target).abs() <= self.config.tolerance {
            Ok((best, iterations))
        } else {
            Err(SolveError::NotConverged {
                target,
                reached,
                iterations,
                best_iz: best,
            })
        }
    }

    /// Realizes `chroma` at `hue` for a known achromatic signal, reducing
    /// chroma until the color fits the sRGB gamut. Non-finite chroma is
    /// realized as neutral.
    pub fn realize(&self, iz: f64, chroma: f64, hue: f64) -> Solution {
        if iz <= 0.0 || !chroma.is_finite() || chroma <= 0.0 {
            let outcome = if chroma > 0.0 {
                GamutOutcome::Neutral
            } else {
                GamutOutcome::InGamut
            };
            return self.finish(iz, self.neutral(iz), outcome);
        }

        if let Some(xyz) = self.feasible(iz, chroma, hue) {
            return self.finish(iz, xyz, GamutOutcome::InGamut);
        }

        let mut infeasible = chroma;
        let mut candidate = chroma * self.config.chroma_step;
        let mut found = None;
        let mut steps = 0;
        while candidate >= self.config.min_chroma && steps < MAX_CHROMA_STEPS {
            if let Some(xyz) = self.feasible(iz, candidate, hue) {
                found = Some((candidate, xyz));
                break;
            }
            infeasible = candidate;
            candidate *= self.config.chroma_step;
            steps += 1;
        }

        let Some((mut feasible, mut xyz)) = found else {
            trace!(iz, chroma, hue, "no chroma fits the gamut");
            return self.finish(iz, self.neutral(iz), GamutOutcome::Neutral);
        };

        for _ in 0..self.config.refine_steps {
            let mid = 0.5 * (feasible + infeasible);
            match self.feasible(iz, mid, hue) {
                Some(mid_xyz) => {
                    feasible = mid;
                    xyz = mid_xyz;
                }
                None => infeasible = mid,
            }
        }
        trace!(iz, requested = chroma, realized = feasible, hue, "chroma reduced");
        self.finish(iz, xyz, GamutOutcome::ChromaReduced)
    }

    /// Absolute XYZ for the given signal and chroma, before any gamut check.
    pub fn unmapped(&self, iz: f64, chroma: f64, hue: f64) -> Tristimulus {
        let magnitude = zcam::opponent_magnitude(chroma, hue, self.vc);
        let h = to_radians(hue);
        zcam::xyz_from_opponent([iz, magnitude * h.cos(), magnitude * h.sin()], self.vc)
    }

    fn feasible(&self, iz: f64, chroma: f64, hue: f64) -> Option<Tristimulus> {
        let xyz = self.unmapped(iz, chroma, hue);
        let linear = xyz_to_linear_srgb(xyz / self.vc.white_luminance());
        in_gamut(linear, self.config.gamut_tolerance).then_some(xyz)
    }

    fn neutral(&self, iz: f64) -> Tristimulus {
        zcam::xyz_from_opponent([iz.max(0.0), 0.0, 0.0], self.vc)
    }

    fn finish(&self, iz: f64, xyz: Tristimulus, gamut: GamutOutcome) -> Solution {
        Solution {
            xyz,
            realized: ZcamCorrelates::from_xyz(xyz, self.vc).to_lch(),
            iz,
            iterations: 0,
            gamut,
        }
    }
}
