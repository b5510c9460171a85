use std::time::Duration;

use glam::Vec2;
use glider_shared::*;

/// What the control mapper did with this tick's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ControlEffect {
    /// Neutral or invalid input.
    Idle,
    /// Direct-displacement move applied to position.
    Displaced,
    /// Thrust impulse applied to velocity.
    Impulse,
    /// Thrust requested inside the rate-limit window and dropped.
    RateLimited,
}

/// Admits at most one thrust impulse per `min_interval` of simulation time.
#[derive(Debug, Clone)]
pub struct ThrustLimiter {
    min_interval: Duration,
    last_impulse: Duration,
}

impl ThrustLimiter {
    /// The limiter is armed at episode start, so the first impulse can land
    /// once `min_interval` of sim time has passed.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_impulse: Duration::ZERO,
        }
    }

    pub fn try_fire(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_impulse) < self.min_interval {
            return false;
        }
        self.last_impulse = now;
        true
    }
}

/// Maps control input onto the craft for one tick.
#[derive(Debug, Clone)]
pub struct ControlMapper {
    scheme: ControlScheme,
    limiter: ThrustLimiter,
}

impl ControlMapper {
    pub fn new(scheme: ControlScheme) -> Self {
        let min_interval = match &scheme {
            ControlScheme::Thrust(thrust) => thrust.min_interval(),
            ControlScheme::Direct(_) => Duration::ZERO,
        };
        Self {
            scheme,
            limiter: ThrustLimiter::new(min_interval),
        }
    }

    /// Apply `input` to the craft. `now` is the sim time at the end of the
    /// tick and drives the thrust rate limiter.
    pub fn apply(&mut self, craft: &mut CraftState, input: ControlInput, now: Duration) -> ControlEffect {
        match self.scheme {
            ControlScheme::Direct(direct) => {
                // No momentum: every tick starts from the glide baseline.
                craft.velocity = Vec2::new(0.0, -direct.descent_rate);
                let delta = displacement(&direct, input);
                if delta == Vec2::ZERO {
                    return ControlEffect::Idle;
                }
                craft.position += delta;
                ControlEffect::Displaced
            }
            ControlScheme::Thrust(thrust) => {
                let Some((dv, dw)) = thrust_impulse(&thrust, input) else {
                    return ControlEffect::Idle;
                };
                if !self.limiter.try_fire(now) {
                    return ControlEffect::RateLimited;
                }
                craft.velocity += dv;
                craft.angular_velocity += dw;
                ControlEffect::Impulse
            }
        }
    }
}

/// Collapse engine flags onto a discrete action. Both engines at once is not
/// a valid state and reads as no thrust.
fn normalize(input: ControlInput) -> Action {
    match input {
        ControlInput::Discrete(action) => action,
        ControlInput::Engines { left: true, right: false } => Action::Left,
        ControlInput::Engines { left: false, right: true } => Action::Right,
        ControlInput::Engines { .. } => Action::NoThrust,
    }
}

fn displacement(direct: &DisplacementConfig, input: ControlInput) -> Vec2 {
    match normalize(input) {
        Action::Left => Vec2::new(-direct.lateral, 0.0),
        Action::Right => Vec2::new(direct.lateral, 0.0),
        Action::Up => Vec2::new(0.0, direct.climb),
        Action::Down => Vec2::new(0.0, -direct.dive),
        Action::NoThrust => Vec2::ZERO,
    }
}

/// Velocity and angular-velocity deltas for one impulse, or `None` for no thrust.
fn thrust_impulse(thrust: &ThrustConfig, input: ControlInput) -> Option<(Vec2, f32)> {
    let action = normalize(input);
    let impulse = match (thrust.layout, action) {
        (_, Action::NoThrust) => return None,
        (ThrusterLayout::Directional, Action::Left) => (Vec2::new(-thrust.lateral, 0.0), 0.0),
        (ThrusterLayout::Directional, Action::Right) => (Vec2::new(thrust.lateral, 0.0), 0.0),
        (ThrusterLayout::Directional, Action::Up) => (Vec2::new(0.0, thrust.vertical), 0.0),
        (ThrusterLayout::Directional, Action::Down) => (Vec2::new(0.0, -thrust.vertical), 0.0),
        // Left engine sits on the left wing: pushes right, rolls clockwise.
        (ThrusterLayout::SideEngines, Action::Left) => (Vec2::new(thrust.lateral, 0.0), thrust.torque),
        (ThrusterLayout::SideEngines, Action::Right) => (Vec2::new(-thrust.lateral, 0.0), -thrust.torque),
        (ThrusterLayout::SideEngines, Action::Up | Action::Down) => return None,
    };
    if impulse.0 == Vec2::ZERO && impulse.1 == 0.0 {
        return None;
    }
    Some(impulse)
}
