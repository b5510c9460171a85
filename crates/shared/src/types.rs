use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{SimConfig, Variant};

/// Rigid-body state of the craft. `position` is the lower-left corner of its
/// bounding box; `y` is altitude above the bottom of the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraftState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Degrees, positive is clockwise.
    pub angle: f32,
    /// Degrees per tick.
    pub angular_velocity: f32,
}

impl CraftState {
    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }

    pub fn altitude(&self) -> f32 {
        self.position.y
    }
}

/// The falling obstacle of the glide variants. `position` is the lower-left
/// corner of its box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleState {
    pub position: Vec2,
}

/// Discrete control action. The integer encoding is the RL action space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    NoThrust,
    Right,
    Up,
    Down,
}

impl Action {
    pub const ALL: [Action; crate::DISCRETE_ACTION_COUNT] = [
        Action::Left,
        Action::NoThrust,
        Action::Right,
        Action::Up,
        Action::Down,
    ];

    /// Decode an action index. Anything outside the action space is no thrust.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Action::Left,
            2 => Action::Right,
            3 => Action::Up,
            4 => Action::Down,
            _ => Action::NoThrust,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::NoThrust => 1,
            Action::Right => 2,
            Action::Up => 3,
            Action::Down => 4,
        }
    }
}

impl Default for Action {
    fn default() -> Self {
        Action::NoThrust
    }
}

/// Per-tick control signal: a discrete action or raw engine flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlInput {
    Discrete(Action),
    Engines { left: bool, right: bool },
}

impl ControlInput {
    pub fn none() -> Self {
        ControlInput::Discrete(Action::NoThrust)
    }

    pub fn left_engine() -> Self {
        ControlInput::Engines {
            left: true,
            right: false,
        }
    }

    pub fn right_engine() -> Self {
        ControlInput::Engines {
            left: false,
            right: true,
        }
    }
}

impl Default for ControlInput {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Action> for ControlInput {
    fn from(action: Action) -> Self {
        ControlInput::Discrete(action)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    Crashed,
    Survived,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Craft box overlapped the obstacle.
    Collision,
    /// Craft left the world beyond the lateral margin.
    OutOfBounds,
    /// Ground contact outside the touchdown tolerances.
    HardLanding,
    /// Ground contact inside the touchdown tolerances.
    Touchdown,
    /// Time budget ran out while airborne.
    Timeout,
}

// ---------------------------------------------------------------------------
// Observations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlideObservation {
    pub plane_x: f32,
    pub plane_y: f32,
    pub wind_x: f32,
    pub time_remaining: f32,
}

impl GlideObservation {
    pub fn to_array(&self) -> [f32; crate::GLIDE_OBS_SIZE] {
        [self.plane_x, self.plane_y, self.wind_x, self.time_remaining]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumObservation {
    pub plane_x: f32,
    pub plane_y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub wind_x: f32,
    pub time_remaining: f32,
}

impl MomentumObservation {
    pub fn to_array(&self) -> [f32; crate::MOMENTUM_OBS_SIZE] {
        [
            self.plane_x,
            self.plane_y,
            self.velocity_x,
            self.velocity_y,
            self.wind_x,
            self.time_remaining,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingObservation {
    pub x: f32,
    pub altitude: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub angle: f32,
    pub angular_velocity: f32,
}

impl LandingObservation {
    pub fn to_array(&self) -> [f32; crate::LANDING_OBS_SIZE] {
        [
            self.x,
            self.altitude,
            self.velocity_x,
            self.velocity_y,
            self.angle,
            self.angular_velocity,
        ]
    }
}

/// Observation handed to a controller. Each variant has its own fixed layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Observation {
    Glide(GlideObservation),
    Momentum(MomentumObservation),
    Landing(LandingObservation),
}

impl Observation {
    pub fn variant(&self) -> Variant {
        match self {
            Observation::Glide(_) => Variant::Glide,
            Observation::Momentum(_) => Variant::MomentumGlide,
            Observation::Landing(_) => Variant::Landing,
        }
    }

    /// Flat vector in the variant's field order.
    pub fn to_vec(&self) -> Vec<f32> {
        match self {
            Observation::Glide(o) => o.to_array().to_vec(),
            Observation::Momentum(o) => o.to_array().to_vec(),
            Observation::Landing(o) => o.to_array().to_vec(),
        }
    }

    pub fn size(&self) -> usize {
        self.variant().obs_size()
    }
}

// ---------------------------------------------------------------------------
// Flight records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraftSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub angle: f32,
}

impl From<&CraftState> for CraftSnapshot {
    fn from(s: &CraftState) -> Self {
        Self {
            x: s.position.x,
            y: s.position.y,
            vx: s.velocity.x,
            vy: s.velocity.y,
            angle: s.angle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSnapshot {
    pub x: f32,
    pub y: f32,
}

impl From<&ObstacleState> for ObstacleSnapshot {
    fn from(o: &ObstacleState) -> Self {
        Self {
            x: o.position.x,
            y: o.position.y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u32,
    pub craft: CraftSnapshot,
    pub obstacle: Option<ObstacleSnapshot>,
    /// Seconds left on the episode timer, if the variant has one.
    pub time_remaining: Option<f32>,
}

/// Counters kept by an episode while it runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub impulses: u32,
    pub rate_limited: u32,
    pub gusts: u32,
    pub respawns: u32,
}

/// Settings for one policy-driven episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u64,
    pub policy_name: String,
    pub max_ticks: u32,
    pub sim: SimConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            policy_name: "neutral".into(),
            max_ticks: crate::MAX_RUN_TICKS,
            sim: SimConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightResult {
    pub outcome: Outcome,
    pub reason: Option<EndReason>,
    pub final_tick: u32,
    pub total_reward: f32,
    pub stats: EpisodeStats,
    /// Ticks where the policy had no action and neutral control was used.
    pub fallback_ticks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    pub config: RunConfig,
    pub frames: Vec<Frame>,
    pub result: FlightResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_indices_cover_the_action_space() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(Action::from_index(i as i64), *action, "index {i} decoded wrongly");
        }
        assert_eq!(Action::from_index(Action::ALL.len() as i64), Action::NoThrust);
    }
}
