use std::path::PathBuf;

use dyeflow::config::MIN_RESOLUTION;
use dyeflow::{SolverConfig, Timestep};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dyeflow-{}-{}", std::process::id(), name))
}

#[test]
fn test_defaults_match_documented_values() {
    let config = SolverConfig::default();
    assert_eq!(config.iterations, 32);
    assert_eq!(config.scale, 0.5);
    assert_eq!(config.color_decay, 0.01);
    assert!(config.boundaries);
    assert_eq!(config.timestep, Timestep::Fps60);
    assert_eq!(config.radius, 0.25);
    assert_eq!(config.smoothing, 0.8);
    assert!(config.simulate);
    assert_eq!(config.sanitized(), config);
}

#[test]
fn test_out_of_range_values_are_clamped() {
    let config = SolverConfig {
        iterations: 1000,
        scale: 0.0,
        color_decay: -1.0,
        radius: f32::NAN,
        smoothing: 1.0,
        ..SolverConfig::default()
    }
    .sanitize_and_report();

    assert_eq!(config.iterations, 128);
    assert_eq!(config.scale, 0.1);
    assert_eq!(config.color_decay, 0.0);
    assert_eq!(config.radius, 0.25);
    assert_eq!(config.smoothing, 0.95);

    let low = SolverConfig {
        iterations: 1,
        scale: 9.0,
        color_decay: 1.0,
        ..SolverConfig::default()
    }
    .sanitized();
    assert_eq!(low.iterations, 16);
    assert_eq!(low.scale, 2.0);
    assert_eq!(low.color_decay, 0.02);
}

#[test]
fn test_timestep_values() {
    let seconds: Vec<f32> = Timestep::ALL.iter().map(|t| t.seconds()).collect();
    assert_eq!(
        seconds,
        vec![1.0 / 15.0, 1.0 / 30.0, 1.0 / 60.0, 1.0 / 90.0, 1.0 / 120.0]
    );
    assert_eq!(Timestep::Fps90.label(), "1/90");
}

#[test]
fn test_grid_resolution_from_display() {
    let config = SolverConfig::default();
    assert_eq!(config.grid_resolution(800.0, 600.0), (400, 300));
    assert_eq!(config.grid_resolution(1.0, 0.0), (MIN_RESOLUTION, MIN_RESOLUTION));
    assert_eq!(
        config.grid_resolution(f32::INFINITY, -5.0),
        (MIN_RESOLUTION, MIN_RESOLUTION)
    );
}

#[test]
fn test_json_uses_timestep_labels_and_defaults_missing_fields() {
    let config: SolverConfig =
        serde_json::from_str(r#"{ "iterations": 64, "timestep": "1/120" }"#).unwrap();
    assert_eq!(config.iterations, 64);
    assert_eq!(config.timestep, Timestep::Fps120);
    assert_eq!(config.scale, SolverConfig::default().scale);

    let json = serde_json::to_string(&SolverConfig::default()).unwrap();
    assert!(json.contains("\"1/60\""));
}

#[test]
fn test_save_and_load_file() {
    let path = temp_path("config.json");
    let config = SolverConfig {
        iterations: 48,
        boundaries: false,
        timestep: Timestep::Fps30,
        ..SolverConfig::default()
    };
    config.save(&path).unwrap();

    let loaded = SolverConfig::load(&path);
    assert_eq!(loaded, config);
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_falls_back_to_defaults() {
    let missing = temp_path("missing.json");
    assert_eq!(SolverConfig::load(&missing), SolverConfig::default());
    assert!(SolverConfig::try_load(&missing).is_err());

    let broken = temp_path("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();
    assert_eq!(SolverConfig::load(&broken), SolverConfig::default());
    std::fs::remove_file(&broken).ok();

    let wild = temp_path("wild.json");
    std::fs::write(&wild, r#"{ "iterations": 4, "color_decay": 3.0 }"#).unwrap();
    let loaded = SolverConfig::load(&wild);
    assert_eq!(loaded.iterations, 16);
    assert_eq!(loaded.color_decay, 0.02);
    std::fs::remove_file(&wild).ok();
}

#[test]
fn test_negative_or_fractional_iterations_are_clamped_not_rejected() {
    let path = temp_path("negative.json");
    std::fs::write(
        &path,
        r#"{ "iterations": -3, "boundaries": false, "timestep": "1/30" }"#,
    )
    .unwrap();

    let loaded = SolverConfig::load(&path);
    assert_eq!(loaded.iterations, 16);
    assert!(!loaded.boundaries);
    assert_eq!(loaded.timestep, Timestep::Fps30);
    std::fs::remove_file(&path).ok();

    let config: SolverConfig = serde_json::from_str(r#"{ "iterations": 40.6 }"#).unwrap();
    assert_eq!(config.iterations, 41);
    let config: SolverConfig = serde_json::from_str(r#"{ "iterations": 1e9 }"#).unwrap();
    assert_eq!(config.sanitized().iterations, 128);
}
