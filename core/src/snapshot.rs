//! Snapshot serialization: full simulation state to/from JSON.
//!
//! A snapshot is what renderers draw from. It captures the complete
//! state needed to resume simulation from that tick.

use crate::{
    clock::{clock_text, SimClock},
    config::MatchRules,
    error::SimResult,
    state::MatchState,
    types::{MatchId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub match_id: MatchId,
    /// Master seed of the run, so a resumed match draws the same numbers.
    pub seed: u64,
    pub tick: Tick,
    pub clock: SimClock,
    pub state: MatchState,
}

impl SimSnapshot {
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Everything the HUD shows for this snapshot.
    pub fn hud(&self, rules: &MatchRules) -> HudView {
        let (p1_score, p2_score) = self.state.scores();
        HudView {
            p1_score,
            p2_score,
            phase: self.state.phase.label().to_string(),
            clock: clock_text(self.state.phase, self.state.elapsed, rules),
            status: self.state.status.clone(),
            can_start: !self.state.running,
        }
    }
}

/// Text-level view for the heads-up display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudView {
    pub p1_score: u32,
    pub p2_score: u32,
    pub phase: String,
    /// `MM:SS`, or `--:--` during sudden death.
    pub clock: String,
    pub status: Option<String>,
    /// Whether a new match may be started.
    pub can_start: bool,
}
