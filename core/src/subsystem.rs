//! Subsystem trait.
//!
//! RULE: Every per-tick pass implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, every running tick.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    error::SimResult,
    event::SimEvent,
    input::InputSource,
    rng::SubsystemRng,
    state::MatchState,
    types::Tick,
};

/// Everything a subsystem may look at during one tick.
pub struct TickContext<'a> {
    pub tick: Tick,
    /// Clamped frame delta in seconds.
    pub dt: f64,
    /// Held-keys snapshot shared by every subsystem this tick.
    pub input: &'a dyn InputSource,
}

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per running tick by the engine.
    ///
    /// Returns the events this pass produced, in the order they happened.
    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut MatchState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;
}
