//! Entity model: the two players, the ball, and the match aggregate.
//!
//! `MatchState` is the root the engine mutates every tick and the only
//! thing renderers and the HUD read.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    config::{BallConfig, FieldConfig, PlayerConfig},
    input::ControlBindings,
    rng::RandomSource,
};

/// Kickoff x of Player 1 as a fraction of field width; Player 2 mirrors it.
pub const KICKOFF_X_FRACTION: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    pub fn from_sign(x: f64) -> Self {
        if x < 0.0 {
            Self::Left
        } else {
            Self::Right
        }
    }
}

/// Which side-line goal a player attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSide {
    Left,
    Right,
}

impl GoalSide {
    /// x coordinate of the goal line.
    pub fn line_x(self, field: &FieldConfig) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Right => field.width,
        }
    }

    /// Shot direction toward this goal, in radians.
    pub fn base_angle(self) -> f64 {
        match self {
            Self::Left => std::f64::consts::PI,
            Self::Right => 0.0,
        }
    }
}

/// Previous/current pressed state of one control, for rising-edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeLatch {
    pub previous: bool,
    pub current: bool,
}

impl EdgeLatch {
    /// Record this tick's pressed state. Returns true on a rising edge.
    pub fn update(&mut self, pressed: bool) -> bool {
        self.previous = self.current;
        self.current = pressed;
        self.current && !self.previous
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Cosmetic; passed through to the renderer untouched.
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub facing: Facing,
    pub controls: ControlBindings,
    pub score: u32,
    pub shoot_cooldown: f64,
    pub tackle_cooldown: f64,
    pub stunned_for: f64,
    pub shoot_latch: EdgeLatch,
    pub tackle_latch: EdgeLatch,
    pub attacks: GoalSide,
}

impl Player {
    pub fn new(id: PlayerId, color: &str, controls: ControlBindings) -> Self {
        let (facing, attacks) = match id {
            PlayerId::One => (Facing::Right, GoalSide::Right),
            PlayerId::Two => (Facing::Left, GoalSide::Left),
        };
        Self {
            id,
            color: color.to_string(),
            x: 0.0,
            y: 0.0,
            facing,
            controls,
            score: 0,
            shoot_cooldown: 0.0,
            tackle_cooldown: 0.0,
            stunned_for: 0.0,
            shoot_latch: EdgeLatch::default(),
            tackle_latch: EdgeLatch::default(),
            attacks,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned_for > 0.0
    }

    /// Kickoff spot for this player on the given field.
    pub fn kickoff_spot(&self, field: &FieldConfig) -> (f64, f64) {
        let fraction = match self.id {
            PlayerId::One => KICKOFF_X_FRACTION,
            PlayerId::Two => 1.0 - KICKOFF_X_FRACTION,
        };
        (field.width * fraction, field.center_y())
    }

    /// Put the player back on the kickoff spot with timers and latches cleared.
    /// Score is kept.
    pub fn reset_for_kickoff(&mut self, field: &FieldConfig) {
        let (x, y) = self.kickoff_spot(field);
        self.x = x;
        self.y = y;
        self.facing = match self.attacks {
            GoalSide::Right => Facing::Right,
            GoalSide::Left => Facing::Left,
        };
        self.shoot_cooldown = 0.0;
        self.tackle_cooldown = 0.0;
        self.stunned_for = 0.0;
        self.shoot_latch.reset();
        self.tackle_latch.reset();
    }

    /// Keep the player's body fully inside the pitch.
    pub fn clamp_to_field(&mut self, field: &FieldConfig, cfg: &PlayerConfig) {
        self.x = self.x.clamp(cfg.radius, field.width - cfg.radius);
        self.y = self.y.clamp(cfg.radius, field.height - cfg.radius);
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub owner: Option<PlayerId>,
}

impl Ball {
    pub fn at_center(field: &FieldConfig) -> Self {
        Self {
            x: field.center_x(),
            y: field.center_y(),
            vx: 0.0,
            vy: 0.0,
            owner: None,
        }
    }

    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Carried position relative to the owner: in front along x, same y.
    pub fn follow(&mut self, owner: &Player, cfg: &BallConfig) {
        self.x = owner.x + owner.facing.sign() * cfg.follow_distance;
        self.y = owner.y;
        self.vx = 0.0;
        self.vy = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    RegularTime,
    Overtime,
    SuddenDeath,
    Final,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::RegularTime => "Regular Time",
            Self::Overtime => "Overtime",
            Self::SuddenDeath => "Sudden Death",
            Self::Final => "Final",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a finished match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Regulation,
    Overtime,
    SuddenDeath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: PlayerId,
    /// (Player 1, Player 2)
    pub score: (u32, u32),
    pub decided_in: Decision,
}

impl MatchOutcome {
    pub fn score_text(&self) -> String {
        format!("{}-{}", self.score.0, self.score.1)
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.decided_in {
            Decision::Regulation => write!(f, "{} wins {}", self.winner, self.score_text()),
            Decision::Overtime => {
                write!(f, "{} wins in overtime {}", self.winner, self.score_text())
            }
            Decision::SuddenDeath => write!(f, "Sudden death winner: {}", self.winner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub running: bool,
    /// Seconds of play since kickoff of the current match.
    pub elapsed: f64,
    pub phase: Phase,
    pub winner: Option<MatchOutcome>,
    /// Latest human-readable status line. Last write wins.
    pub status: Option<String>,
    pub players: [Player; 2],
    pub ball: Ball,
}

impl MatchState {
    /// Idle state with the default roster already on the kickoff spots.
    pub fn new(field: &FieldConfig) -> Self {
        let mut players = [
            Player::new(PlayerId::One, "#f97316", ControlBindings::wasd()),
            Player::new(PlayerId::Two, "#38bdf8", ControlBindings::arrows()),
        ];
        for player in &mut players {
            player.reset_for_kickoff(field);
        }
        Self {
            running: false,
            elapsed: 0.0,
            phase: Phase::Idle,
            winner: None,
            status: None,
            players,
            ball: Ball::at_center(field),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// The player attacking the given goal, if any.
    pub fn attacker_of(&self, side: GoalSide) -> Option<PlayerId> {
        self.players.iter().find(|p| p.attacks == side).map(|p| p.id)
    }

    /// (Player 1, Player 2) scores.
    pub fn scores(&self) -> (u32, u32) {
        let score = |id| self.player(id).map_or(0, |p| p.score);
        (score(PlayerId::One), score(PlayerId::Two))
    }

    /// Kickoff layout: players on their spots, ball at center, owner drawn
    /// uniformly between the two players.
    pub fn reset_positions(&mut self, field: &FieldConfig, rng: &mut dyn RandomSource) -> PlayerId {
        for player in &mut self.players {
            player.reset_for_kickoff(field);
        }
        let owner = if rng.chance(0.5) {
            PlayerId::One
        } else {
            PlayerId::Two
        };
        self.ball = Ball {
            owner: Some(owner),
            ..Ball::at_center(field)
        };
        owner
    }
}
