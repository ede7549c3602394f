//! Simulation clock: the tick counter, frame-delta clamping and
//! the countdown shown on the HUD.

use crate::{config::MatchRules, state::Phase, types::Tick};
use serde::{Deserialize, Serialize};

/// Shown instead of a countdown while sudden death is running.
pub const SUDDEN_DEATH_CLOCK: &str = "--:--";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub current_tick: Tick,
    /// Largest dt a single tick may consume, in seconds.
    pub max_frame_dt: f64,
    /// dt actually applied on the most recent tick, after clamping.
    pub last_dt: f64,
}

impl SimClock {
    pub fn new(max_frame_dt: f64) -> Self {
        Self {
            current_tick: 0,
            max_frame_dt,
            last_dt: 0.0,
        }
    }

    /// Advance one tick with a raw frame delta. Returns the new tick number
    /// and the clamped dt.
    ///
    /// `raw_dt` must be finite and non-negative.
    pub fn advance(&mut self, raw_dt: f64) -> (Tick, f64) {
        let dt = raw_dt.min(self.max_frame_dt);
        self.current_tick += 1;
        self.last_dt = dt;
        (self.current_tick, dt)
    }
}

/// Seconds left on the countdown for the given phase, floored at zero.
/// Sudden death has no countdown and reports `None`.
pub fn remaining_seconds(phase: Phase, elapsed: f64, rules: &MatchRules) -> Option<f64> {
    match phase {
        Phase::RegularTime => Some((rules.regular_seconds - elapsed).max(0.0)),
        Phase::Overtime => {
            let overtime_elapsed = elapsed - rules.regular_seconds;
            Some((rules.overtime_seconds - overtime_elapsed).max(0.0))
        }
        Phase::SuddenDeath => None,
        Phase::Idle | Phase::Final => Some(0.0),
    }
}

/// `MM:SS` of the remaining time, rounding partial seconds up.
pub fn format_clock(seconds: f64) -> String {
    let whole = seconds.max(0.0).ceil() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

/// HUD clock text for the given phase.
pub fn clock_text(phase: Phase, elapsed: f64, rules: &MatchRules) -> String {
    match remaining_seconds(phase, elapsed, rules) {
        Some(seconds) => format_clock(seconds),
        None => SUDDEN_DEATH_CLOCK.to_string(),
    }
}
