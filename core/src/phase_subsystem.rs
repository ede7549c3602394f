//! Match phase state machine.
//!
//!   Idle → RegularTime → Final
//!                      → Overtime → Final
//!                                 → SuddenDeath → Final (goal path only)
//!
//! Final is terminal for a match; starting a new match re-enters
//! RegularTime. Time-based transitions are evaluated here, after goals.

use crate::{
    config::MatchRules,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    state::{Decision, MatchOutcome, MatchState, Phase, PlayerId},
    subsystem::{SimSubsystem, TickContext},
    types::Tick,
};

/// Stop the match and record the outcome.
pub fn end_match(tick: Tick, state: &mut MatchState, outcome: MatchOutcome) -> Vec<SimEvent> {
    let from = state.phase;
    state.running = false;
    state.phase = Phase::Final;
    state.winner = Some(outcome.clone());
    log::info!("tick={tick} phase: match over after {:.2}s, {outcome}", state.elapsed);
    vec![
        SimEvent::PhaseChanged { tick, from, to: Phase::Final },
        SimEvent::MatchFinished { tick, outcome },
    ]
}

fn enter(tick: Tick, state: &mut MatchState, to: Phase) -> SimEvent {
    let from = state.phase;
    state.phase = to;
    log::info!("tick={tick} phase: {from} -> {to} at {:.2}s", state.elapsed);
    SimEvent::PhaseChanged { tick, from, to }
}

/// Outcome when one side leads; `None` on a tie.
fn leader_outcome(score: (u32, u32), decided_in: Decision) -> Option<MatchOutcome> {
    let winner = match score.0.cmp(&score.1) {
        std::cmp::Ordering::Greater => PlayerId::One,
        std::cmp::Ordering::Less => PlayerId::Two,
        std::cmp::Ordering::Equal => return None,
    };
    Some(MatchOutcome { winner, score, decided_in })
}

/// Apply the time-based transitions for the current elapsed time.
///
/// A single call can pass through Overtime when elapsed already exceeds
/// both thresholds.
pub fn update_phase(tick: Tick, state: &mut MatchState, rules: &MatchRules) -> Vec<SimEvent> {
    let mut events = Vec::new();
    let score = state.scores();

    if state.phase == Phase::RegularTime && state.elapsed >= rules.regular_seconds {
        if let Some(outcome) = leader_outcome(score, Decision::Regulation) {
            events.extend(end_match(tick, state, outcome));
            return events;
        }
        events.push(enter(tick, state, Phase::Overtime));
    }

    if state.phase == Phase::Overtime && state.elapsed >= rules.overtime_end() {
        if let Some(outcome) = leader_outcome(score, Decision::Overtime) {
            events.extend(end_match(tick, state, outcome));
            return events;
        }
        events.push(enter(tick, state, Phase::SuddenDeath));
    }

    events
}

pub struct PhaseSubsystem {
    rules: MatchRules,
}

impl PhaseSubsystem {
    pub fn new(rules: MatchRules) -> Self {
        Self { rules }
    }
}

impl SimSubsystem for PhaseSubsystem {
    fn name(&self) -> &'static str { "phase" }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut MatchState,
        _rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(update_phase(ctx.tick, state, &self.rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;

    fn state_at(phase: Phase, elapsed: f64, score: (u32, u32)) -> MatchState {
        let mut state = MatchState::new(&FieldConfig::default());
        state.running = true;
        state.phase = phase;
        state.elapsed = elapsed;
        state.players[0].score = score.0;
        state.players[1].score = score.1;
        state
    }

    #[test]
    fn nothing_happens_before_regulation_ends() {
        let mut state = state_at(Phase::RegularTime, 179.99, (0, 0));
        assert!(update_phase(1, &mut state, &MatchRules::default()).is_empty());
        assert_eq!(state.phase, Phase::RegularTime);
    }

    #[test]
    fn lead_at_full_time_wins() {
        let mut state = state_at(Phase::RegularTime, 180.0, (1, 3));
        let events = update_phase(1, &mut state, &MatchRules::default());

        assert_eq!(state.phase, Phase::Final);
        assert!(!state.running);
        assert_eq!(state.winner.as_ref().map(|o| o.winner), Some(PlayerId::Two));
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1].status_text().as_deref(),
            Some("Player 2 wins 1-3")
        );
    }

    #[test]
    fn tie_at_full_time_goes_to_overtime() {
        let mut state = state_at(Phase::RegularTime, 180.0, (2, 2));
        let events = update_phase(1, &mut state, &MatchRules::default());

        assert_eq!(state.phase, Phase::Overtime);
        assert!(state.running);
        assert_eq!(
            events,
            vec![SimEvent::PhaseChanged { tick: 1, from: Phase::RegularTime, to: Phase::Overtime }]
        );
    }

    #[test]
    fn overtime_lead_wins_in_overtime() {
        let mut state = state_at(Phase::Overtime, 210.0, (3, 2));
        update_phase(1, &mut state, &MatchRules::default());

        let outcome = state.winner.expect("decided");
        assert_eq!(outcome.decided_in, Decision::Overtime);
        assert_eq!(outcome.to_string(), "Player 1 wins in overtime 3-2");
    }

    #[test]
    fn tie_after_overtime_goes_to_sudden_death() {
        let mut state = state_at(Phase::Overtime, 210.0, (0, 0));
        update_phase(1, &mut state, &MatchRules::default());
        assert_eq!(state.phase, Phase::SuddenDeath);

        // Sudden death has no clock.
        state.elapsed = 10_000.0;
        assert!(update_phase(2, &mut state, &MatchRules::default()).is_empty());
        assert_eq!(state.phase, Phase::SuddenDeath);
    }

    #[test]
    fn one_evaluation_can_fall_through_overtime() {
        let mut state = state_at(Phase::RegularTime, 250.0, (1, 1));
        let events = update_phase(1, &mut state, &MatchRules::default());

        assert_eq!(state.phase, Phase::SuddenDeath);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn idle_and_final_are_never_advanced_by_time() {
        for phase in [Phase::Idle, Phase::Final] {
            let mut state = state_at(phase, 999.0, (0, 0));
            assert!(update_phase(1, &mut state, &MatchRules::default()).is_empty());
            assert_eq!(state.phase, phase);
        }
    }
}
