//! Simulation configuration: per-variant presets, validation and JSON loading.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Direct-displacement glide, 4-field observation.
    Glide,
    /// Thrust-driven glide with gravity and gusts, 6-field observation.
    MomentumGlide,
    /// Two-engine balance landing.
    Landing,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Glide, Variant::MomentumGlide, Variant::Landing];

    pub fn obs_size(self) -> usize {
        match self {
            Variant::Glide => GLIDE_OBS_SIZE,
            Variant::MomentumGlide => MOMENTUM_OBS_SIZE,
            Variant::Landing => LANDING_OBS_SIZE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Glide => "glide",
            Variant::MomentumGlide => "momentum_glide",
            Variant::Landing => "landing",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glide" => Ok(Variant::Glide),
            "momentum_glide" | "momentum" => Ok(Variant::MomentumGlide),
            "landing" => Ok(Variant::Landing),
            other => Err(ConfigError::Invalid {
                field: "variant",
                reason: format!("unknown variant `{other}`"),
            }),
        }
    }
}

/// Per-tick integration constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Subtracted from vertical velocity every tick.
    pub gravity: f32,
    pub drag_x: f32,
    pub drag_y: f32,
    pub angular_damping: f32,
}

/// Position deltas for the direct-displacement scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementConfig {
    pub lateral: f32,
    pub climb: f32,
    pub dive: f32,
    /// Baseline sink rate; the craft's velocity is reset to `(0, -descent_rate)` every tick.
    pub descent_rate: f32,
}

/// How thrust actions map onto the craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrusterLayout {
    /// Left/Right/Up push the craft toward that direction.
    Directional,
    /// Two side engines: the left engine pushes right and rolls clockwise.
    SideEngines,
}

/// Velocity impulses for the thrust/torque scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrustConfig {
    pub layout: ThrusterLayout,
    pub lateral: f32,
    pub vertical: f32,
    /// Degrees per tick added to angular velocity.
    pub torque: f32,
    /// Minimum sim time between two registered impulses. Zero disables the limiter.
    pub min_interval_ms: u64,
}

impl ThrustConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum ControlScheme {
    Direct(DisplacementConfig),
    Thrust(ThrustConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Altitude of the ground for touchdown detection.
    pub ground_level: f32,
    /// When set, the craft is not clamped horizontally; leaving
    /// `[-margin, width + margin]` is a crash instead.
    pub lateral_margin: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CraftConfig {
    pub width: f32,
    pub height: f32,
    pub spawn: Vec2,
    pub initial_velocity: Vec2,
    /// Uniform horizontal spawn offset in `[-jitter, jitter]`. Zero keeps the spawn fixed.
    pub spawn_jitter_x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub width: f32,
    pub height: f32,
    pub fall_speed: f32,
    pub spawn_x_min: f32,
    pub spawn_x_max: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    pub gust_probability: f64,
    pub gust_strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingConfig {
    pub angle_tolerance_deg: f32,
    pub speed_tolerance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Paid every non-crash tick.
    pub airborne: f32,
    /// Scaled by `altitude / world.height` and added to `airborne`.
    pub altitude_bonus: f32,
    pub crash_penalty: f32,
    /// Added when the timer runs out.
    pub survival_bonus: f32,
    /// Added on a touchdown inside tolerances.
    pub landing_bonus: f32,
}

/// Everything an episode needs to run. Build one from a preset and tweak it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub variant: Variant,
    pub tick_ms: u64,
    /// Episode time budget. `None` runs until a terminal outcome.
    pub time_budget_ms: Option<u64>,
    pub physics: PhysicsConfig,
    pub control: ControlScheme,
    pub world: WorldConfig,
    pub craft: CraftConfig,
    pub obstacle: Option<ObstacleConfig>,
    pub wind: Option<WindConfig>,
    pub landing: Option<LandingConfig>,
    pub reward: RewardConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::glide()
    }
}

impl SimConfig {
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Glide => Self::glide(),
            Variant::MomentumGlide => Self::momentum_glide(),
            Variant::Landing => Self::landing(),
        }
    }

    pub fn glide() -> Self {
        Self {
            variant: Variant::Glide,
            tick_ms: DEFAULT_TICK_MS,
            time_budget_ms: Some(EPISODE_SECS * 1000),
            physics: PhysicsConfig {
                gravity: 0.0,
                drag_x: 1.0,
                drag_y: 1.0,
                angular_damping: 1.0,
            },
            control: ControlScheme::Direct(DisplacementConfig {
                lateral: GLIDE_LATERAL_STEP,
                climb: GLIDE_CLIMB_STEP,
                dive: GLIDE_DIVE_STEP,
                descent_rate: GLIDE_DESCENT_RATE,
            }),
            world: WorldConfig {
                width: GLIDE_WORLD_WIDTH,
                height: GLIDE_WORLD_HEIGHT,
                ground_level: 0.0,
                lateral_margin: None,
            },
            craft: CraftConfig {
                width: GLIDE_CRAFT_WIDTH,
                height: GLIDE_CRAFT_HEIGHT,
                spawn: Vec2::new(GLIDE_SPAWN_X, GLIDE_SPAWN_Y),
                initial_velocity: Vec2::new(0.0, -GLIDE_DESCENT_RATE),
                spawn_jitter_x: 0.0,
            },
            obstacle: Some(ObstacleConfig {
                width: OBSTACLE_SIZE,
                height: OBSTACLE_SIZE,
                fall_speed: GLIDE_OBSTACLE_FALL_SPEED,
                spawn_x_min: OBSTACLE_SPAWN_X_MIN,
                spawn_x_max: OBSTACLE_SPAWN_X_MAX,
            }),
            wind: None,
            landing: None,
            reward: RewardConfig {
                airborne: AIRBORNE_REWARD,
                altitude_bonus: 0.0,
                crash_penalty: CRASH_PENALTY,
                survival_bonus: SURVIVAL_BONUS,
                landing_bonus: 0.0,
            },
        }
    }

    pub fn momentum_glide() -> Self {
        Self {
            variant: Variant::MomentumGlide,
            tick_ms: DEFAULT_TICK_MS,
            time_budget_ms: Some(EPISODE_SECS * 1000),
            physics: PhysicsConfig {
                gravity: MOMENTUM_GRAVITY,
                drag_x: 1.0,
                drag_y: 1.0,
                angular_damping: 1.0,
            },
            control: ControlScheme::Thrust(ThrustConfig {
                layout: ThrusterLayout::Directional,
                lateral: MOMENTUM_LATERAL_THRUST,
                vertical: MOMENTUM_VERTICAL_THRUST,
                torque: 0.0,
                min_interval_ms: 0,
            }),
            world: WorldConfig {
                width: MOMENTUM_WORLD_WIDTH,
                height: MOMENTUM_WORLD_HEIGHT,
                ground_level: 0.0,
                lateral_margin: None,
            },
            craft: CraftConfig {
                width: GLIDE_CRAFT_WIDTH,
                height: GLIDE_CRAFT_HEIGHT,
                spawn: Vec2::new(MOMENTUM_SPAWN_X, MOMENTUM_SPAWN_Y),
                initial_velocity: Vec2::ZERO,
                spawn_jitter_x: 0.0,
            },
            obstacle: Some(ObstacleConfig {
                width: OBSTACLE_SIZE,
                height: OBSTACLE_SIZE,
                fall_speed: MOMENTUM_OBSTACLE_FALL_SPEED,
                spawn_x_min: OBSTACLE_SPAWN_X_MIN,
                spawn_x_max: OBSTACLE_SPAWN_X_MAX,
            }),
            wind: Some(WindConfig {
                gust_probability: GUST_PROBABILITY,
                gust_strength: GUST_STRENGTH,
            }),
            landing: None,
            reward: RewardConfig {
                airborne: AIRBORNE_REWARD,
                altitude_bonus: MOMENTUM_ALTITUDE_BONUS,
                crash_penalty: CRASH_PENALTY,
                survival_bonus: SURVIVAL_BONUS,
                landing_bonus: 0.0,
            },
        }
    }

    pub fn landing() -> Self {
        Self {
            variant: Variant::Landing,
            tick_ms: DEFAULT_TICK_MS,
            time_budget_ms: None,
            physics: PhysicsConfig {
                gravity: LANDING_GRAVITY,
                drag_x: LANDING_DRAG_X,
                drag_y: LANDING_DRAG_Y,
                angular_damping: LANDING_ANGULAR_DAMPING,
            },
            control: ControlScheme::Thrust(ThrustConfig {
                layout: ThrusterLayout::SideEngines,
                lateral: LANDING_LATERAL_THRUST,
                vertical: 0.0,
                torque: LANDING_TORQUE,
                min_interval_ms: THRUST_MIN_INTERVAL_MS,
            }),
            world: WorldConfig {
                width: LANDING_WORLD_WIDTH,
                height: LANDING_WORLD_HEIGHT,
                ground_level: LANDING_GROUND_LEVEL,
                lateral_margin: Some(LANDING_LATERAL_MARGIN),
            },
            craft: CraftConfig {
                width: LANDING_CRAFT_WIDTH,
                height: LANDING_CRAFT_HEIGHT,
                spawn: Vec2::new(LANDING_SPAWN_X, LANDING_SPAWN_Y),
                initial_velocity: Vec2::new(0.0, -LANDING_INITIAL_DESCENT),
                spawn_jitter_x: 0.0,
            },
            obstacle: None,
            wind: None,
            landing: Some(LandingConfig {
                angle_tolerance_deg: LANDING_ANGLE_TOLERANCE_DEG,
                speed_tolerance: LANDING_SPEED_TOLERANCE,
            }),
            reward: RewardConfig {
                airborne: 0.0,
                altitude_bonus: 0.0,
                crash_penalty: CRASH_PENALTY,
                survival_bonus: 0.0,
                landing_bonus: LANDING_BONUS,
            },
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }

    /// Read a JSON config file and validate it. Missing top-level sections
    /// fall back to the glide preset.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check every parameter the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be positive"));
        }
        if self.time_budget_ms == Some(0) {
            return Err(invalid("time_budget_ms", "must be positive when set"));
        }

        let p = &self.physics;
        check_unit_interval("physics.drag_x", p.drag_x)?;
        check_unit_interval("physics.drag_y", p.drag_y)?;
        check_unit_interval("physics.angular_damping", p.angular_damping)?;
        if !p.gravity.is_finite() || p.gravity < 0.0 {
            return Err(invalid("physics.gravity", "must be finite and non-negative"));
        }

        if !(self.world.width > 0.0) || !(self.world.height > 0.0) {
            return Err(invalid("world", "width and height must be positive"));
        }
        if let Some(margin) = self.world.lateral_margin {
            if !(margin >= 0.0) {
                return Err(invalid("world.lateral_margin", "must be non-negative"));
            }
        }
        if !(self.craft.width > 0.0) || !(self.craft.height > 0.0) {
            return Err(invalid("craft", "width and height must be positive"));
        }
        if !(self.craft.spawn_jitter_x >= 0.0) {
            return Err(invalid("craft.spawn_jitter_x", "must be non-negative"));
        }

        if let Some(obstacle) = &self.obstacle {
            if !(obstacle.width > 0.0) || !(obstacle.height > 0.0) {
                return Err(invalid("obstacle", "width and height must be positive"));
            }
            if !(obstacle.spawn_x_min < obstacle.spawn_x_max) {
                return Err(invalid("obstacle", "spawn_x_min must be below spawn_x_max"));
            }
        }
        if let Some(wind) = &self.wind {
            if !(0.0..=1.0).contains(&wind.gust_probability) {
                return Err(invalid("wind.gust_probability", "must be within [0, 1]"));
            }
        }
        if let Some(landing) = &self.landing {
            if !(landing.angle_tolerance_deg > 0.0) || !(landing.speed_tolerance > 0.0) {
                return Err(invalid("landing", "tolerances must be positive"));
            }
        }

        match self.variant {
            Variant::Glide | Variant::MomentumGlide => {
                if self.obstacle.is_none() {
                    return Err(invalid("obstacle", "required for glide variants"));
                }
                if self.time_budget_ms.is_none() {
                    return Err(invalid("time_budget_ms", "required for glide variants"));
                }
            }
            Variant::Landing => {
                if self.landing.is_none() {
                    return Err(invalid("landing", "required for the landing variant"));
                }
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

/// Multiplicative damping factors must lie in (0, 1].
fn check_unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be within (0, 1], got {value}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for variant in Variant::ALL {
            let config = SimConfig::preset(variant);
            assert_eq!(config.variant, variant);
            config
                .validate()
                .unwrap_or_else(|e| panic!("{variant} preset should validate: {e}"));
        }
    }

    #[test]
    fn test_drag_outside_unit_interval_rejected() {
        let mut config = SimConfig::landing();
        config.physics.drag_x = 1.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "physics.drag_x", .. }));

        config.physics.drag_x = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_glide_requires_obstacle() {
        let mut config = SimConfig::glide();
        config.obstacle = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "obstacle", .. })
        ));
    }

    #[test]
    fn test_landing_requires_tolerances() {
        let mut config = SimConfig::landing();
        config.landing = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_spawn_range_rejected() {
        let mut config = SimConfig::glide();
        if let Some(obstacle) = config.obstacle.as_mut() {
            obstacle.spawn_x_min = 300.0;
            obstacle.spawn_x_max = 100.0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_preset() {
        let config = SimConfig::momentum_glide();
        let json = config.to_json_pretty().expect("preset should serialize");
        let parsed = SimConfig::from_json(&json).expect("preset should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_falls_back_to_glide() {
        let parsed = SimConfig::from_json(r#"{ "tick_ms": 50 }"#).expect("partial config");
        assert_eq!(parsed.tick_ms, 50);
        assert_eq!(parsed.variant, Variant::Glide);
        assert_eq!(parsed.obstacle, SimConfig::glide().obstacle);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = SimConfig::load(Path::new("/nonexistent/glider.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("glide".parse::<Variant>().ok(), Some(Variant::Glide));
        assert_eq!("momentum".parse::<Variant>().ok(), Some(Variant::MomentumGlide));
        assert_eq!("landing".parse::<Variant>().ok(), Some(Variant::Landing));
        assert!("lunar".parse::<Variant>().is_err());
    }
}
