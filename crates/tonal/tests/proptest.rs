//! Property-based tests for the appearance model and palette generation.

use proptest::prelude::*;
use tonal::{
    Rgb, SolverConfig, TonalPaletteGenerator, ToneQuality, ViewingConditions, ZcamCorrelates,
    ZcamSolver,
};
use tonal_colorspace::math::hue_distance;

// ============================================================================
// Strategies
// ============================================================================

fn rgb_strategy() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb(r, g, b))
}

fn viewing() -> ViewingConditions {
    ViewingConditions::builder().build().unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-3 * a.abs().max(1e-2)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Inverting the forward model recovers every in-gamut color.
    #[test]
    fn inverse_recovers_forward(rgb in rgb_strategy()) {
        let vc = viewing();
        let xyz = rgb.to_xyz() * vc.white_luminance();
        let target = ZcamCorrelates::from_xyz(xyz, &vc).to_lch();
        let solution = ZcamSolver::new(&vc, SolverConfig::default()).solve(target).unwrap();

        prop_assert!(close(xyz.x, solution.xyz.x), "{} x: {} vs {}", rgb, xyz.x, solution.xyz.x);
        prop_assert!(close(xyz.y, solution.xyz.y), "{} y: {} vs {}", rgb, xyz.y, solution.xyz.y);
        prop_assert!(close(xyz.z, solution.xyz.z), "{} z: {} vs {}", rgb, xyz.z, solution.xyz.z);
        prop_assert_eq!(Rgb::from_xyz(solution.xyz / vc.white_luminance()), rgb);
    }

    /// Forward correlates stay in their documented ranges.
    #[test]
    fn correlate_ranges(rgb in rgb_strategy()) {
        let vc = viewing();
        let c = ZcamCorrelates::from_xyz(rgb.to_xyz() * vc.white_luminance(), &vc);
        prop_assert!((0.0..360.0).contains(&c.hz));
        prop_assert!((0.0..400.0).contains(&c.hue_quadrature));
        prop_assert!(c.jz >= 0.0 && c.jz < 100.0 + 1e-3);
        prop_assert!(c.cz >= 0.0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Palettes are ordered by lightness and keep the seed hue wherever they
    /// keep any chroma.
    #[test]
    fn palette_invariants(rgb in rgb_strategy()) {
        let vc = viewing();
        let palette = TonalPaletteGenerator::new().generate(rgb.to_xyz() * vc.white_luminance(), &vc);
        prop_assert_eq!(palette.entries().len(), 13);
        prop_assert!(!palette.is_degraded());

        for pair in palette.entries().windows(2) {
            prop_assert!(pair[1].realized.l > pair[0].realized.l);
        }
        for entry in palette.entries() {
            if entry.quality == ToneQuality::Neutral || entry.realized.c < 1e-3 {
                continue;
            }
            prop_assert!(
                hue_distance(entry.realized.h, palette.hue()) < 5.0,
                "{} tone {}: {} vs {}",
                rgb,
                entry.tone,
                entry.realized.h,
                palette.hue()
            );
        }
    }

    /// Generation is a pure function of seed and viewing conditions.
    #[test]
    fn palette_deterministic(rgb in rgb_strategy()) {
        let vc = viewing();
        let seed = rgb.to_xyz() * vc.white_luminance();
        let generator = TonalPaletteGenerator::new();
        prop_assert_eq!(generator.generate(seed, &vc), generator.generate(seed, &vc));
    }
}
