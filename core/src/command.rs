use serde::{Deserialize, Serialize};

/// Match control commands in serialized form, as sent one JSON object
/// per line by an external loop that cannot call the engine directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchCommand {
    /// Reset scores and timers and kick off a new match.
    Start,
    /// Advance one frame with the given keys held.
    Tick {
        dt: f64,
        #[serde(default)]
        held: Vec<String>,
    },
    /// Advance up to `count` frames with the same keys held, stopping
    /// early if the match ends.
    Frames {
        count: u64,
        dt: f64,
        #[serde(default)]
        held: Vec<String>,
    },
    /// Change nothing; the caller only wants the current state.
    GetState,
}
