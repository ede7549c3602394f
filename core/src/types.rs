//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one rendered frame.
pub type Tick = u64;

/// The canonical match identifier.
pub type MatchId = String;
