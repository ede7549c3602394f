use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Pitch geometry. The origin is the top-left corner; y grows downward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f64,
    pub height: f64,
    /// Vertical span of each goal mouth, centered on the halfway height.
    pub goal_height: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
            goal_height: 180.0,
        }
    }
}

impl FieldConfig {
    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }

    pub fn goal_top(&self) -> f64 {
        self.center_y() - self.goal_height / 2.0
    }

    pub fn goal_bottom(&self) -> f64 {
        self.center_y() + self.goal_height / 2.0
    }

    /// True when `y` lies within the goal mouth span (edges inclusive).
    pub fn in_goal_lane(&self, y: f64) -> bool {
        y >= self.goal_top() && y <= self.goal_bottom()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchRules {
    pub regular_seconds: f64,
    pub overtime_seconds: f64,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            regular_seconds: 180.0,
            overtime_seconds: 30.0,
        }
    }
}

impl MatchRules {
    /// Elapsed time at which overtime expires.
    pub fn overtime_end(&self) -> f64 {
        self.regular_seconds + self.overtime_seconds
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    pub radius: f64,
    /// Units per second.
    pub speed: f64,
    pub shoot_cooldown: f64,
    pub tackle_cooldown: f64,
    /// Max center distance at which a tackle can connect.
    pub tackle_range: f64,
    pub tackle_stun_duration: f64,
    /// Over-correction multiplier applied when separating overlapping players.
    pub collision_push: f64,
    pub tackle_success_chance: f64,
    /// Minimum |x| of the movement direction before facing flips.
    pub facing_deadzone: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 18.0,
            speed: 240.0,
            shoot_cooldown: 2.0,
            tackle_cooldown: 1.5,
            tackle_range: 48.0,
            tackle_stun_duration: 0.5,
            collision_push: 1.8,
            tackle_success_chance: 0.6,
            facing_deadzone: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f64,
    /// Velocity multiplier applied once per tick.
    pub friction: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub possession_distance: f64,
    /// Offset along the owner's facing at which a carried ball sits.
    pub follow_distance: f64,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            friction: 0.992,
            min_speed: 8.0,
            max_speed: 620.0,
            possession_distance: 25.0,
            follow_distance: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShotConfig {
    pub base_speed: f64,
    /// Extra speed at point-blank range, scaled by closeness.
    pub closeness_speed_bonus: f64,
    /// Angular spread in radians from the far end of the pitch.
    pub max_spread: f64,
    /// Gap left between the shooter's body and the released ball.
    pub release_gap: f64,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            base_speed: 360.0,
            closeness_speed_bonus: 280.0,
            max_spread: 0.55,
            release_gap: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub field: FieldConfig,
    pub rules: MatchRules,
    pub player: PlayerConfig,
    pub ball: BallConfig,
    pub shot: ShotConfig,
    /// Upper bound on a single frame's dt in seconds.
    pub max_frame_dt: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            rules: MatchRules::default(),
            player: PlayerConfig::default(),
            ball: BallConfig::default(),
            shot: ShotConfig::default(),
            max_frame_dt: 0.033,
        }
    }
}

impl SimConfig {
    /// Load from a JSON rules file. Missing sections and keys fall back
    /// to the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        positive("field.width", self.field.width)?;
        positive("field.height", self.field.height)?;
        positive("field.goal_height", self.field.goal_height)?;
        if self.field.goal_height > self.field.height {
            return Err(invalid("field.goal_height", "exceeds field height"));
        }

        non_negative("rules.regular_seconds", self.rules.regular_seconds)?;
        non_negative("rules.overtime_seconds", self.rules.overtime_seconds)?;

        positive("player.radius", self.player.radius)?;
        positive("player.speed", self.player.speed)?;
        if self.player.radius * 2.0 >= self.field.width.min(self.field.height) {
            return Err(invalid("player.radius", "player does not fit on the field"));
        }
        non_negative("player.shoot_cooldown", self.player.shoot_cooldown)?;
        non_negative("player.tackle_cooldown", self.player.tackle_cooldown)?;
        non_negative("player.tackle_range", self.player.tackle_range)?;
        non_negative("player.tackle_stun_duration", self.player.tackle_stun_duration)?;
        positive("player.collision_push", self.player.collision_push)?;
        probability("player.tackle_success_chance", self.player.tackle_success_chance)?;
        non_negative("player.facing_deadzone", self.player.facing_deadzone)?;

        positive("ball.radius", self.ball.radius)?;
        if !(self.ball.friction > 0.0 && self.ball.friction <= 1.0) {
            return Err(invalid("ball.friction", "must be in (0, 1]"));
        }
        non_negative("ball.min_speed", self.ball.min_speed)?;
        positive("ball.max_speed", self.ball.max_speed)?;
        if self.ball.min_speed >= self.ball.max_speed {
            return Err(invalid("ball.min_speed", "must be below ball.max_speed"));
        }
        non_negative("ball.possession_distance", self.ball.possession_distance)?;
        non_negative("ball.follow_distance", self.ball.follow_distance)?;

        non_negative("shot.base_speed", self.shot.base_speed)?;
        non_negative("shot.closeness_speed_bonus", self.shot.closeness_speed_bonus)?;
        non_negative("shot.max_spread", self.shot.max_spread)?;
        non_negative("shot.release_gap", self.shot.release_gap)?;

        positive("max_frame_dt", self.max_frame_dt)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> SimError {
    SimError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be positive, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be non-negative, got {value}")))
    }
}

fn probability(field: &'static str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be in [0, 1], got {value}")))
    }
}
