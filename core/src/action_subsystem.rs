//! Possession & action subsystem: shooting and tackling.
//!
//! Both actions fire on the rising edge of their control. The latch is
//! updated every tick before any other check, so holding a key through
//! a cooldown never produces a second action.

use crate::{
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    input::{Control, InputSource},
    rng::{RandomSource, SubsystemRng},
    state::{Ball, MatchState, Player},
    subsystem::{SimSubsystem, TickContext},
    types::Tick,
};

/// Shoot toward the attacked goal if the shoot key was just pressed, the
/// cooldown is spent and the player carries the ball.
///
/// Closer shots are faster and straighter.
pub fn try_shoot(
    tick: Tick,
    player: &mut Player,
    ball: &mut Ball,
    input: &dyn InputSource,
    cfg: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Option<SimEvent> {
    let pressed_now = player
        .shoot_latch
        .update(input.is_held(&player.controls, Control::Shoot));

    if !pressed_now || player.shoot_cooldown > 0.0 || ball.owner != Some(player.id) {
        return None;
    }

    let goal_x = player.attacks.line_x(&cfg.field);
    let dist_to_goal = (goal_x - player.x).abs();
    let closeness = 1.0 - (dist_to_goal / cfg.field.width).min(1.0);
    let speed = cfg.shot.base_speed + closeness * cfg.shot.closeness_speed_bonus;
    let spread = (1.0 - closeness) * cfg.shot.max_spread;
    let angle = player.attacks.base_angle() + (rng.next_f64() * 2.0 - 1.0) * spread;

    let (dir_y, dir_x) = angle.sin_cos();
    let release = cfg.player.radius + cfg.ball.radius + cfg.shot.release_gap;

    ball.owner = None;
    ball.vx = dir_x * speed;
    ball.vy = dir_y * speed;
    ball.x = player.x + dir_x * release;
    ball.y = player.y + dir_y * release;

    player.shoot_cooldown = cfg.player.shoot_cooldown;

    log::debug!(
        "tick={tick} action: {} shot speed={speed:.1} angle={angle:.3} closeness={closeness:.2}",
        player.id
    );

    Some(SimEvent::ShotFired {
        tick,
        player: player.id,
        speed,
        angle,
    })
}

/// Attempt to win the ball from `opponent`.
///
/// A valid press always spends the cooldown, even when the opponent has
/// no ball or is out of range. Inside range the tackle succeeds when the
/// draw is at most the configured chance; otherwise the tackler is stunned.
pub fn try_tackle(
    tick: Tick,
    player: &mut Player,
    opponent: &Player,
    ball: &mut Ball,
    input: &dyn InputSource,
    cfg: &SimConfig,
    rng: &mut dyn RandomSource,
) -> Option<SimEvent> {
    let pressed_now = player
        .tackle_latch
        .update(input.is_held(&player.controls, Control::Tackle));

    if !pressed_now || player.tackle_cooldown > 0.0 || player.is_stunned() {
        return None;
    }

    player.tackle_cooldown = cfg.player.tackle_cooldown;

    if ball.owner != Some(opponent.id) {
        return None;
    }

    if player.distance_to(opponent.x, opponent.y) > cfg.player.tackle_range {
        return None;
    }

    if rng.next_f64() <= cfg.player.tackle_success_chance {
        ball.owner = Some(player.id);
        log::debug!("tick={tick} action: {} won the ball from {}", player.id, opponent.id);
        return Some(SimEvent::TackleWon {
            tick,
            player: player.id,
            opponent: opponent.id,
        });
    }

    player.stunned_for = cfg.player.tackle_stun_duration;
    log::debug!("tick={tick} action: {} missed a tackle", player.id);
    Some(SimEvent::TackleMissed {
        tick,
        player: player.id,
        stunned_for: player.stunned_for,
    })
}

pub struct ActionSubsystem {
    config: SimConfig,
}

impl ActionSubsystem {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }
}

impl SimSubsystem for ActionSubsystem {
    fn name(&self) -> &'static str { "action" }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut MatchState,
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let cfg = &self.config;
        let ball = &mut state.ball;
        let [p1, p2] = &mut state.players;

        let events = [
            try_shoot(ctx.tick, p1, ball, ctx.input, cfg, rng),
            try_shoot(ctx.tick, p2, ball, ctx.input, cfg, rng),
            try_tackle(ctx.tick, p1, p2, ball, ctx.input, cfg, rng),
            try_tackle(ctx.tick, p2, p1, ball, ctx.input, cfg, rng),
        ];

        Ok(events.into_iter().flatten().collect())
    }
}
