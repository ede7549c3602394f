//! Goal detection & scoring.
//!
//! A goal counts only while the ball is inside the goal lane and has fully
//! crossed an end line. The player attacking that end line scores.

use crate::{
    config::{BallConfig, FieldConfig},
    error::SimResult,
    event::SimEvent,
    phase_subsystem::end_match,
    rng::{RandomSource, SubsystemRng},
    state::{Decision, GoalSide, MatchOutcome, MatchState, Phase, PlayerId},
    subsystem::{SimSubsystem, TickContext},
    types::Tick,
};

/// Which goal, if any, the ball is fully inside of.
pub fn crossed_goal(state: &MatchState, field: &FieldConfig, cfg: &BallConfig) -> Option<GoalSide> {
    let ball = &state.ball;
    if !field.in_goal_lane(ball.y) {
        return None;
    }
    if ball.x + cfg.radius < 0.0 {
        Some(GoalSide::Left)
    } else if ball.x - cfg.radius > field.width {
        Some(GoalSide::Right)
    } else {
        None
    }
}

/// Credit the scorer, then either end the match (sudden death) or kick off again.
pub fn handle_goal(
    tick: Tick,
    state: &mut MatchState,
    scorer: PlayerId,
    field: &FieldConfig,
    rng: &mut dyn RandomSource,
) -> Vec<SimEvent> {
    let Some(player) = state.player_mut(scorer) else {
        log::warn!("tick={tick} goal: scorer {scorer} not on the roster");
        return vec![];
    };
    player.score += 1;

    let score = state.scores();
    log::info!("tick={tick} goal: {scorer} scores, {}-{}", score.0, score.1);
    let mut events = vec![SimEvent::GoalScored { tick, scorer, score }];

    if state.phase == Phase::SuddenDeath {
        let outcome = MatchOutcome {
            winner: scorer,
            score,
            decided_in: Decision::SuddenDeath,
        };
        events.extend(end_match(tick, state, outcome));
        return events;
    }

    let owner = state.reset_positions(field, rng);
    events.push(SimEvent::Kickoff { tick, owner });
    events
}

pub struct GoalSubsystem {
    field: FieldConfig,
    ball: BallConfig,
}

impl GoalSubsystem {
    pub fn new(field: FieldConfig, ball: BallConfig) -> Self {
        Self { field, ball }
    }
}

impl SimSubsystem for GoalSubsystem {
    fn name(&self) -> &'static str { "goal" }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut MatchState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let Some(side) = crossed_goal(state, &self.field, &self.ball) else {
            return Ok(vec![]);
        };
        let Some(scorer) = state.attacker_of(side) else {
            log::warn!("tick={} goal: nobody attacks the {side:?} goal, ignoring", ctx.tick);
            return Ok(vec![]);
        };
        Ok(handle_goal(ctx.tick, state, scorer, &self.field, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn running_state() -> (FieldConfig, BallConfig, MatchState) {
        let field = FieldConfig::default();
        let cfg = BallConfig::default();
        let mut state = MatchState::new(&field);
        state.running = true;
        state.phase = Phase::RegularTime;
        (field, cfg, state)
    }

    #[test]
    fn ball_past_the_left_line_in_the_lane_is_a_goal_for_the_left_attacker() {
        let (field, cfg, mut state) = running_state();
        state.ball.x = -10.5;
        state.ball.y = 200.0;
        assert_eq!(crossed_goal(&state, &field, &cfg), Some(GoalSide::Left));
        assert_eq!(state.attacker_of(GoalSide::Left), Some(PlayerId::Two));

        state.ball.x = -9.5;
        assert_eq!(crossed_goal(&state, &field, &cfg), None, "leading edge must fully cross");
    }

    #[test]
    fn ball_outside_the_lane_never_scores() {
        let (field, cfg, mut state) = running_state();
        state.ball.x = 980.0;
        state.ball.y = 100.0;
        assert_eq!(crossed_goal(&state, &field, &cfg), None);

        state.ball.y = 300.0;
        assert_eq!(crossed_goal(&state, &field, &cfg), Some(GoalSide::Right));
    }

    #[test]
    fn regular_goal_scores_and_kicks_off_again() {
        let (field, _, mut state) = running_state();
        state.ball.x = -20.0;
        state.players[1].x = 50.0;

        let events = handle_goal(9, &mut state, PlayerId::Two, &field, &mut Fixed(0.2));

        assert_eq!(
            events,
            vec![
                SimEvent::GoalScored { tick: 9, scorer: PlayerId::Two, score: (0, 1) },
                SimEvent::Kickoff { tick: 9, owner: PlayerId::One },
            ]
        );
        assert!(state.running);
        assert_eq!(state.players[1].x, 720.0);
        assert_eq!(state.ball.x, 480.0);
    }

    #[test]
    fn sudden_death_goal_ends_the_match() {
        let (field, _, mut state) = running_state();
        state.phase = Phase::SuddenDeath;
        state.players[0].score = 4;
        state.players[1].score = 4;

        let events = handle_goal(30, &mut state, PlayerId::One, &field, &mut Fixed(0.2));

        assert!(!state.running);
        assert_eq!(state.phase, Phase::Final);
        let outcome = state.winner.clone().expect("winner recorded");
        assert_eq!(outcome.winner, PlayerId::One);
        assert_eq!(outcome.score, (5, 4));
        assert_eq!(
            events.last().and_then(SimEvent::status_text).as_deref(),
            Some("Sudden death winner: Player 1")
        );
    }
}
