//! The simulation engine. Owns the match and advances it one frame at a time.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Movement subsystem   (cooldowns, player movement, collisions)
//!   2. Action subsystem     (shoot P1, shoot P2, tackle P1, tackle P2)
//!   3. Ball subsystem       (carry or free flight, auto-pickup)
//!   4. Goal subsystem       (scoring, kickoff or sudden-death finish)
//!   5. Phase subsystem      (time-based phase transitions)
//!
//! RULES:
//!   - Subsystems execute in registration order, every running tick.
//!   - The held-keys snapshot is the same for every subsystem in a tick.
//!   - All randomness flows through the RngBank.
//!   - All subsystem events are recorded in the event log.

use crate::{
    action_subsystem::ActionSubsystem,
    ball_subsystem::BallSubsystem,
    clock::SimClock,
    command::MatchCommand,
    config::SimConfig,
    error::{SimError, SimResult},
    event::{EventLog, EventLogEntry, SimEvent},
    goal_subsystem::GoalSubsystem,
    input::{HeldKeys, InputSource},
    movement_subsystem::MovementSubsystem,
    phase_subsystem::PhaseSubsystem,
    rng::{RngBank, SubsystemSlot},
    snapshot::{HudView, SimSnapshot},
    state::{MatchState, Phase},
    subsystem::{SimSubsystem, TickContext},
    types::{MatchId, Tick},
};

pub struct SimEngine {
    pub match_id: MatchId,
    pub clock: SimClock,
    pub rng_bank: RngBank,
    config: SimConfig,
    subsystems: Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    state: MatchState,
    event_log: EventLog,
}

impl SimEngine {
    /// Bare engine with no subsystems registered.
    pub fn new(match_id: MatchId, seed: u64, config: SimConfig) -> Self {
        Self {
            clock: SimClock::new(config.max_frame_dt),
            rng_bank: RngBank::new(seed),
            state: MatchState::new(&config.field),
            subsystems: Vec::new(),
            event_log: EventLog::new(),
            config,
            match_id,
        }
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(match_id: MatchId, seed: u64, config: SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut engine = SimEngine::new(match_id, seed, config);
        let cfg = engine.config.clone();

        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(
            SubsystemSlot::Movement,
            Box::new(MovementSubsystem::new(cfg.field.clone(), cfg.player.clone())),
        );
        engine.register(SubsystemSlot::Action, Box::new(ActionSubsystem::new(cfg.clone())));
        engine.register(
            SubsystemSlot::Ball,
            Box::new(BallSubsystem::new(cfg.field.clone(), cfg.ball.clone())),
        );
        engine.register(
            SubsystemSlot::Goal,
            Box::new(GoalSubsystem::new(cfg.field.clone(), cfg.ball.clone())),
        );
        engine.register(SubsystemSlot::Phase, Box::new(PhaseSubsystem::new(cfg.rules)));
        Ok(engine)
    }

    /// Fully wired engine with the default tuning.
    pub fn build_default(match_id: MatchId, seed: u64) -> SimResult<Self> {
        Self::build(match_id, seed, SimConfig::default())
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    /// Reset scores and timers and kick off a new match.
    ///
    /// Rejected while a match is running; accepted from Idle and Final.
    pub fn start(&mut self) -> SimResult<Vec<SimEvent>> {
        if self.state.running {
            return Err(SimError::MatchInProgress);
        }

        let tick = self.clock.current_tick;
        let from = self.state.phase;

        self.state.running = true;
        self.state.elapsed = 0.0;
        self.state.phase = Phase::RegularTime;
        self.state.winner = None;
        for player in &mut self.state.players {
            player.score = 0;
        }

        let mut rng = self.rng_bank.for_subsystem_at_tick(SubsystemSlot::Kickoff, tick);
        let owner = self.state.reset_positions(&self.config.field, &mut rng);

        log::info!(
            "tick={tick} engine: match {} started (seed {}), {owner} kicks off",
            self.match_id,
            self.rng_bank.master_seed()
        );

        let events = vec![
            SimEvent::MatchStarted { tick, seed: self.rng_bank.master_seed() },
            SimEvent::PhaseChanged { tick, from, to: Phase::RegularTime },
            SimEvent::Kickoff { tick, owner },
        ];
        self.record(tick, "engine", &events)?;
        Ok(events)
    }

    /// Advance one frame. This is the core simulation step.
    ///
    /// `dt` is the raw frame delta in seconds and must be finite and
    /// non-negative; it is clamped to `max_frame_dt`. Nothing happens
    /// while no match is running.
    pub fn tick(&mut self, dt: f64, input: &dyn InputSource) -> SimResult<Vec<SimEvent>> {
        if !self.state.running {
            return Ok(vec![]);
        }

        let (current_tick, dt) = self.clock.advance(dt);
        self.state.elapsed += dt;

        let mut tick_events: Vec<SimEvent> = vec![SimEvent::TickStarted { tick: current_tick }];

        for (slot, subsystem) in &mut self.subsystems {
            let mut rng = self.rng_bank.for_subsystem_at_tick(*slot, current_tick);
            let ctx = TickContext { tick: current_tick, dt, input };
            let new_events = subsystem.update(&ctx, &mut self.state, &mut rng)?;

            for event in &new_events {
                self.event_log.append(&self.match_id, current_tick, subsystem.name(), event)?;
                if let Some(text) = event.status_text() {
                    self.state.status = Some(text);
                }
            }

            tick_events.extend(new_events);
        }

        tick_events.push(SimEvent::TickCompleted { tick: current_tick });
        Ok(tick_events)
    }

    /// Run n frames of the same dt and input. Used for testing and fast-forward.
    /// Stops early if the match ends.
    pub fn run_ticks(&mut self, n: u64, dt: f64, input: &dyn InputSource) -> SimResult<Vec<SimEvent>> {
        let mut events = Vec::new();
        for _ in 0..n {
            if !self.state.running {
                break;
            }
            events.extend(self.tick(dt, input)?);
        }
        Ok(events)
    }

    /// Apply a serialized control command.
    pub fn submit_command(&mut self, command: MatchCommand) -> SimResult<Vec<SimEvent>> {
        match command {
            MatchCommand::Start => self.start(),
            MatchCommand::Tick { dt, held } => {
                let keys: HeldKeys = held.into_iter().collect();
                self.tick(dt, &keys)
            }
            MatchCommand::Frames { count, dt, held } => {
                let keys: HeldKeys = held.into_iter().collect();
                self.run_ticks(count, dt, &keys)
            }
            MatchCommand::GetState => Ok(vec![]),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Direct state access for tooling and tests. Production loops only
    /// go through start() and tick().
    pub fn state_mut(&mut self) -> &mut MatchState {
        &mut self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Query logged events for a specific tick.
    /// Used by the determinism test and replay tooling.
    pub fn events_for_tick(&self, tick: Tick) -> Vec<&EventLogEntry> {
        self.event_log.events_for_tick(tick)
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            match_id: self.match_id.clone(),
            seed: self.rng_bank.master_seed(),
            tick: self.clock.current_tick,
            clock: self.clock.clone(),
            state: self.state.clone(),
        }
    }

    pub fn hud(&self) -> HudView {
        self.snapshot().hud(&self.config.rules)
    }

    /// Resume from a previously taken snapshot.
    ///
    /// The snapshot's seed replaces this engine's, so later draws match the
    /// original run. The frame-delta bound always comes from this engine's
    /// validated config, never from the snapshot.
    pub fn restore(&mut self, snapshot: SimSnapshot) {
        log::debug!(
            "engine: restoring match {} at tick {} (seed {})",
            snapshot.match_id,
            snapshot.tick,
            snapshot.seed
        );
        self.match_id = snapshot.match_id;
        self.rng_bank = RngBank::new(snapshot.seed);
        self.clock = snapshot.clock;
        self.clock.max_frame_dt = self.config.max_frame_dt;
        self.state = snapshot.state;
    }

    fn record(&mut self, tick: Tick, subsystem: &str, events: &[SimEvent]) -> SimResult<()> {
        for event in events {
            self.event_log.append(&self.match_id, tick, subsystem, event)?;
            if let Some(text) = event.status_text() {
                self.state.status = Some(text);
            }
        }
        Ok(())
    }
}
