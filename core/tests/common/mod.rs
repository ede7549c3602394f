#![allow(dead_code)]

use kickoff_core::{engine::SimEngine, input::HeldKeys};

pub const FRAME: f64 = 1.0 / 60.0;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn build_engine(match_id: &str, seed: u64) -> SimEngine {
    init_logging();
    SimEngine::build_default(match_id.to_string(), seed).expect("build engine")
}

pub fn started_engine(match_id: &str, seed: u64) -> SimEngine {
    let mut engine = build_engine(match_id, seed);
    engine.start().expect("start match");
    engine
}

pub fn keys(held: &[&str]) -> HeldKeys {
    held.iter().copied().collect()
}

pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}
