//! Everything that happens during a tick is an event.
//!
//! Subsystems return events; the engine appends them to the event log
//! and derives the HUD status line from them.

use crate::{
    state::{MatchOutcome, Phase, PlayerId},
    types::{MatchId, Tick},
};
use serde::{Deserialize, Serialize};

/// Every event emitted during simulation.
/// Variants may be appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TickStarted {
        tick: Tick,
    },
    TickCompleted {
        tick: Tick,
    },
    MatchStarted {
        tick: Tick,
        seed: u64,
    },

    // ── Kickoff and possession ─────────────────────
    Kickoff {
        tick: Tick,
        owner: PlayerId,
    },
    PossessionGained {
        tick: Tick,
        player: PlayerId,
    },
    /// The ball referenced an owner that is not on the roster.
    OwnerLost {
        tick: Tick,
        owner: PlayerId,
    },

    // ── Actions ────────────────────────────────────
    ShotFired {
        tick: Tick,
        player: PlayerId,
        speed: f64,
        angle: f64,
    },
    TackleWon {
        tick: Tick,
        player: PlayerId,
        opponent: PlayerId,
    },
    TackleMissed {
        tick: Tick,
        player: PlayerId,
        stunned_for: f64,
    },

    // ── Scoring and phases ─────────────────────────
    GoalScored {
        tick: Tick,
        scorer: PlayerId,
        score: (u32, u32),
    },
    PhaseChanged {
        tick: Tick,
        from: Phase,
        to: Phase,
    },
    MatchFinished {
        tick: Tick,
        outcome: MatchOutcome,
    },
}

impl SimEvent {
    /// Stable name used for the event_type column of the log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TickStarted { .. } => "tick_started",
            Self::TickCompleted { .. } => "tick_completed",
            Self::MatchStarted { .. } => "match_started",
            Self::Kickoff { .. } => "kickoff",
            Self::PossessionGained { .. } => "possession_gained",
            Self::OwnerLost { .. } => "owner_lost",
            Self::ShotFired { .. } => "shot_fired",
            Self::TackleWon { .. } => "tackle_won",
            Self::TackleMissed { .. } => "tackle_missed",
            Self::GoalScored { .. } => "goal_scored",
            Self::PhaseChanged { .. } => "phase_changed",
            Self::MatchFinished { .. } => "match_finished",
        }
    }

    /// Status line for the HUD, if this event warrants one.
    pub fn status_text(&self) -> Option<String> {
        match self {
            Self::Kickoff { .. } => Some("Kickoff!".to_string()),
            Self::PossessionGained { player, .. } => Some(format!("{player} gained possession.")),
            Self::TackleWon { player, .. } => Some(format!("{player} won a tackle!")),
            Self::TackleMissed { player, .. } => {
                Some(format!("{player} missed tackle and is stunned."))
            }
            Self::GoalScored { scorer, .. } => Some(format!("Goal! {scorer} scores.")),
            Self::PhaseChanged { to: Phase::Overtime, .. } => {
                Some("Tie game. Overtime begins!".to_string())
            }
            Self::PhaseChanged { to: Phase::SuddenDeath, .. } => {
                Some("Sudden death: next goal wins!".to_string())
            }
            Self::MatchFinished { outcome, .. } => Some(outcome.to_string()),
            _ => None,
        }
    }
}

/// The event log entry as kept by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub seq: u64,
    pub match_id: MatchId,
    pub tick: Tick,
    pub subsystem: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}

/// Append-only, in-memory log of every subsystem event of a session.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<EventLogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        match_id: &str,
        tick: Tick,
        subsystem: &str,
        event: &SimEvent,
    ) -> serde_json::Result<()> {
        let entry = EventLogEntry {
            seq: self.entries.len() as u64,
            match_id: match_id.to_string(),
            tick,
            subsystem: subsystem.to_string(),
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(event)?,
        };
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }

    pub fn events_for_tick(&self, tick: Tick) -> Vec<&EventLogEntry> {
        self.entries.iter().filter(|e| e.tick == tick).collect()
    }

    pub fn count_of(&self, event_type: &str) -> usize {
        self.entries.iter().filter(|e| e.event_type == event_type).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
