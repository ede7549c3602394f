mod common;

use kickoff_core::{config::SimConfig, engine::SimEngine, error::SimError};

fn rules_path() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/../data/rules.json").to_string()
}

#[test]
fn shipped_rules_file_matches_the_defaults() {
    let config = SimConfig::load(&rules_path()).expect("load data/rules.json");
    assert_eq!(config, SimConfig::default());
}

#[test]
fn partial_rules_file_overrides_only_what_it_names() {
    let path = std::env::temp_dir().join(format!("kickoff-rules-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "rules": { "regular_seconds": 60 }, "ball": { "friction": 0.98 } }"#)
        .unwrap();

    let config = SimConfig::load(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.rules.regular_seconds, 60.0);
    assert_eq!(config.rules.overtime_seconds, 30.0);
    assert_eq!(config.ball.friction, 0.98);
    assert_eq!(config.field, SimConfig::default().field);

    // A shorter regulation shows up on the HUD clock.
    let mut engine = SimEngine::build("short".into(), 1, config).unwrap();
    engine.start().unwrap();
    assert_eq!(engine.hud().clock, "01:00");
}

#[test]
fn missing_file_is_reported() {
    let err = SimConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"));
}

#[test]
fn invalid_config_is_rejected_by_build() {
    common::init_logging();
    let mut config = SimConfig::default();
    config.max_frame_dt = 0.0;

    let err = SimEngine::build("bad".into(), 1, config).err().expect("rejected");
    assert!(matches!(err, SimError::InvalidConfig { field: "max_frame_dt", .. }));
}
