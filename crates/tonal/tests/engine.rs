//! Theming service driven from a configuration file.

use std::io::Write;
use std::sync::Arc;

use serial_test::serial;
use tonal::{
    reset_mode_detector, set_mode_detector, CacheStats, ColorMode, ConfigError, EngineConfig,
    PaletteRole, Rgb, Surround, ThemeEngine, Tone,
};

const CONFIG: &str = r##"
dark_theme: follow-device
white_luminance: 200.0
light:
  surround: average
  background: 0.2
dark:
  surround: dim
  background: 0.1
tones: [0, 10, 40, 80, 90, 100]
cache_capacity: 2
seeds: ["#4285f4", "#e91e63", "#009688"]
"##;

fn config_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn follows_device_mode() {
    let file = config_file();
    let config = EngineConfig::from_file(file.path()).unwrap();

    set_mode_detector(|| ColorMode::Light);
    let mut engine = ThemeEngine::new(config).unwrap();
    assert_eq!(engine.mode(), ColorMode::Light);
    assert_eq!(engine.viewing_conditions().surround(), Surround::Average);

    let light = engine.seed_palettes(0).unwrap();
    assert_eq!(light.primary.entries().len(), 6);

    // OS switches to dark
    set_mode_detector(|| ColorMode::Dark);
    assert!(engine.refresh().unwrap());
    assert_eq!(engine.viewing_conditions().surround(), Surround::Dim);
    assert!(engine.cache().is_empty());

    let dark = engine.seed_palettes(0).unwrap();
    assert!(!Arc::ptr_eq(&light, &dark));
    assert_ne!(light.primary.seed_lch(), dark.primary.seed_lch());

    // no change, nothing dropped
    assert!(!engine.refresh().unwrap());
    assert_eq!(engine.cache().len(), 1);

    reset_mode_detector();
}

#[test]
#[serial]
fn capacity_bounds_cache() {
    set_mode_detector(|| ColorMode::Light);
    let engine = ThemeEngine::new(EngineConfig::from_yaml(CONFIG).unwrap()).unwrap();
    reset_mode_detector();

    engine.prepare(&engine.config().seeds.clone());
    assert_eq!(engine.cache().len(), 2);
    assert_eq!(engine.cache().stats(), CacheStats { hits: 0, misses: 3 });

    // the first seed was evicted and is regenerated
    engine.seed_palettes(0).unwrap();
    assert_eq!(engine.cache().stats().misses, 4);
}

#[test]
fn role_accessor() {
    let engine = ThemeEngine::new(EngineConfig {
        dark_theme: tonal::DarkThemePreference::Off,
        ..Default::default()
    })
    .unwrap();
    let family = engine.palettes_for_rgb(Rgb(0, 150, 136));
    let t90 = Tone::new(90).unwrap();
    for role in PaletteRole::ALL {
        let rgb = family.tone(role, t90).unwrap();
        // tone 90 is a light color in every role
        assert!(rgb.to_xyz().y > 0.3, "{:?} {}", role, rgb);
    }
}

#[test]
fn missing_file_reports_path() {
    let err = EngineConfig::from_file("/definitely/not/here.yaml").unwrap_err();
    match err {
        ConfigError::Load { path, .. } => assert!(path.ends_with("here.yaml")),
        other => panic!("unexpected {:?}", other),
    }
}
