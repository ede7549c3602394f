//! Ball physics subsystem.
//!
//! A carried ball is glued to its owner. A free ball integrates its
//! velocity, decays it by a fixed friction factor per tick, bounces off
//! the touchlines, and bounces off the end lines everywhere except in
//! front of the goal mouths. Afterwards any player close enough picks it up.

use crate::{
    config::{BallConfig, FieldConfig},
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    state::{Ball, MatchState, Player},
    subsystem::{SimSubsystem, TickContext},
    types::Tick,
};

/// Advance a free ball by one tick: move, apply friction, bound the speed,
/// then bounce off the walls.
pub fn integrate_free_ball(ball: &mut Ball, dt: f64, field: &FieldConfig, cfg: &BallConfig) {
    ball.x += ball.vx * dt;
    ball.y += ball.vy * dt;

    ball.vx *= cfg.friction;
    ball.vy *= cfg.friction;

    let speed = ball.speed();
    if speed > cfg.max_speed {
        let scale = cfg.max_speed / speed;
        ball.vx *= scale;
        ball.vy *= scale;
    }
    if speed < cfg.min_speed {
        ball.vx = 0.0;
        ball.vy = 0.0;
    }

    let r = cfg.radius;

    if ball.y - r <= 0.0 || ball.y + r >= field.height {
        ball.vy = -ball.vy;
        ball.y = ball.y.clamp(r, field.height - r);
    }

    // The end lines are open in front of each goal.
    if !field.in_goal_lane(ball.y) && (ball.x - r <= 0.0 || ball.x + r >= field.width) {
        ball.vx = -ball.vx;
        ball.x = ball.x.clamp(r, field.width - r);
    }
}

/// First player in roster order within possession distance of a loose ball.
pub fn pickup_candidate<'a>(ball: &Ball, players: &'a [Player], cfg: &BallConfig) -> Option<&'a Player> {
    if ball.owner.is_some() {
        return None;
    }
    players
        .iter()
        .find(|p| p.distance_to(ball.x, ball.y) <= cfg.possession_distance)
}

/// Run one tick of ball processing on the match state.
pub fn update_ball(
    tick: Tick,
    state: &mut MatchState,
    dt: f64,
    field: &FieldConfig,
    cfg: &BallConfig,
) -> Vec<SimEvent> {
    if let Some(owner_id) = state.ball.owner {
        match state.players.iter().find(|p| p.id == owner_id) {
            Some(owner) => state.ball.follow(owner, cfg),
            None => {
                log::warn!("tick={tick} ball: owner {owner_id} not on the roster, releasing ball");
                state.ball.owner = None;
                return vec![SimEvent::OwnerLost { tick, owner: owner_id }];
            }
        }
        return vec![];
    }

    integrate_free_ball(&mut state.ball, dt, field, cfg);

    match pickup_candidate(&state.ball, &state.players, cfg) {
        Some(owner) => {
            state.ball.follow(owner, cfg);
            state.ball.owner = Some(owner.id);
            log::debug!("tick={tick} ball: {} picked up the ball", owner.id);
            vec![SimEvent::PossessionGained { tick, player: owner.id }]
        }
        None => vec![],
    }
}

pub struct BallSubsystem {
    field: FieldConfig,
    ball: BallConfig,
}

impl BallSubsystem {
    pub fn new(field: FieldConfig, ball: BallConfig) -> Self {
        Self { field, ball }
    }
}

impl SimSubsystem for BallSubsystem {
    fn name(&self) -> &'static str { "ball" }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut MatchState,
        _rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        Ok(update_ball(ctx.tick, state, ctx.dt, &self.field, &self.ball))
    }
}
