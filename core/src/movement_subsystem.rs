//! Movement & collision subsystem.
//!
//! Each tick: decay every player's timers, move each player from the
//! held controls, then push overlapping players apart.

use crate::{
    config::{FieldConfig, PlayerConfig},
    error::SimResult,
    event::SimEvent,
    input::InputSource,
    rng::SubsystemRng,
    state::{Facing, MatchState, Player},
    subsystem::{SimSubsystem, TickContext},
};

/// Count down shoot/tackle cooldowns and stun, floored at zero.
pub fn update_cooldowns(player: &mut Player, dt: f64) {
    player.shoot_cooldown = (player.shoot_cooldown - dt).max(0.0);
    player.tackle_cooldown = (player.tackle_cooldown - dt).max(0.0);
    player.stunned_for = (player.stunned_for - dt).max(0.0);
}

/// Move one player from its held direction controls.
///
/// Stunned players ignore input entirely. The direction is normalized so
/// diagonals are no faster than straight runs.
pub fn apply_movement(
    player: &mut Player,
    input: &dyn InputSource,
    dt: f64,
    field: &FieldConfig,
    cfg: &PlayerConfig,
) {
    if player.is_stunned() {
        return;
    }

    let (ix, iy) = input.axes(&player.controls);
    if ix == 0.0 && iy == 0.0 {
        return;
    }

    let magnitude = ix.hypot(iy);
    let nx = ix / magnitude;
    let ny = iy / magnitude;

    player.x += nx * cfg.speed * dt;
    player.y += ny * cfg.speed * dt;

    if nx.abs() > cfg.facing_deadzone {
        player.facing = Facing::from_sign(nx);
    }

    player.clamp_to_field(field, cfg);
}

/// Separate two overlapping players. Returns true if they were pushed.
///
/// Coincident centers have no separation axis and are left alone.
pub fn resolve_player_collision(
    a: &mut Player,
    b: &mut Player,
    field: &FieldConfig,
    cfg: &PlayerConfig,
) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let distance = dx.hypot(dy);
    let min_distance = cfg.radius * 2.0;

    if distance == 0.0 || distance >= min_distance {
        return false;
    }

    let overlap = min_distance - distance;
    let push = overlap * 0.5 * cfg.collision_push;
    let push_x = dx / distance * push;
    let push_y = dy / distance * push;

    a.x -= push_x;
    a.y -= push_y;
    b.x += push_x;
    b.y += push_y;

    a.clamp_to_field(field, cfg);
    b.clamp_to_field(field, cfg);
    true
}

/// Resolve every unordered pair once, in roster order.
pub fn resolve_collisions(players: &mut [Player], field: &FieldConfig, cfg: &PlayerConfig) -> usize {
    let mut resolved = 0;
    for i in 0..players.len() {
        let (head, tail) = players.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_player_collision(a, b, field, cfg) {
                resolved += 1;
            }
        }
    }
    resolved
}

pub struct MovementSubsystem {
    field: FieldConfig,
    player: PlayerConfig,
}

impl MovementSubsystem {
    pub fn new(field: FieldConfig, player: PlayerConfig) -> Self {
        Self { field, player }
    }
}

impl SimSubsystem for MovementSubsystem {
    fn name(&self) -> &'static str { "movement" }

    fn update(
        &mut self,
        ctx: &TickContext<'_>,
        state: &mut MatchState,
        _rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        for player in &mut state.players {
            update_cooldowns(player, ctx.dt);
            apply_movement(player, ctx.input, ctx.dt, &self.field, &self.player);
        }

        let pushed = resolve_collisions(&mut state.players, &self.field, &self.player);
        if pushed > 0 {
            log::trace!("tick={} movement: separated {pushed} overlapping pair(s)", ctx.tick);
        }

        Ok(vec![])
    }
}
