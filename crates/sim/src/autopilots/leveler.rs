use glider_shared::*;

use crate::policy::Policy;

/// Degrees of predicted attitude error tolerated before firing an engine.
const ATTITUDE_DEADBAND: f32 = 2.0;

/// Landing autopilot: keeps the wings level for touchdown.
///
/// An impulse keeps rotating the craft until damping eats it, so the policy
/// acts on the angle the craft will settle at, not the angle it has now.
/// Each engine both rolls and pushes, which means paired corrections also
/// cancel the lateral drift they introduce.
pub struct LevelerPolicy {
    deadband: f32,
    settle_gain: f32,
}

impl LevelerPolicy {
    /// Leveler tuned to the angular damping of `config`.
    pub fn new(config: &SimConfig) -> Self {
        let damping = config.physics.angular_damping;
        // Without damping a spin never settles; act on the current angle.
        let settle_gain = if damping < 1.0 { damping / (1.0 - damping) } else { 0.0 };
        Self {
            deadband: ATTITUDE_DEADBAND,
            settle_gain,
        }
    }

    /// Angle the craft would settle at with no further thrust.
    pub fn settled_angle(&self, obs: &LandingObservation) -> f32 {
        obs.angle + obs.angular_velocity * self.settle_gain
    }
}

impl Policy for LevelerPolicy {
    fn name(&self) -> &str {
        "leveler"
    }

    fn act(&mut self, obs: &Observation) -> Option<ControlInput> {
        let Observation::Landing(obs) = obs else {
            return None;
        };

        let settled = self.settled_angle(obs);
        let input = if settled > self.deadband {
            // Right engine rolls counter-clockwise.
            ControlInput::right_engine()
        } else if settled < -self.deadband {
            ControlInput::left_engine()
        } else {
            ControlInput::none()
        };
        Some(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landing_obs(angle: f32, angular_velocity: f32) -> Observation {
        Observation::Landing(LandingObservation {
            x: 300.0,
            altitude: 150.0,
            velocity_x: 0.0,
            velocity_y: -2.0,
            angle,
            angular_velocity,
        })
    }

    #[test]
    fn test_level_flight_needs_nothing() {
        let mut policy = LevelerPolicy::new(&SimConfig::landing());
        assert_eq!(policy.act(&landing_obs(0.5, 0.0)), Some(ControlInput::none()));
    }

    #[test]
    fn test_counters_spin_before_angle_builds() {
        let mut policy = LevelerPolicy::new(&SimConfig::landing());
        // Small angle but spinning clockwise: settles far past the deadband.
        assert_eq!(policy.act(&landing_obs(1.0, 0.9)), Some(ControlInput::right_engine()));
        assert_eq!(policy.act(&landing_obs(-1.0, -0.9)), Some(ControlInput::left_engine()));
    }

    #[test]
    fn test_no_fire_when_spin_already_returns_to_level() {
        let mut policy = LevelerPolicy::new(&SimConfig::landing());
        let obs = LandingObservation {
            x: 300.0,
            altitude: 150.0,
            velocity_x: 0.0,
            velocity_y: -2.0,
            angle: 5.0,
            angular_velocity: -5.0 / policy.settle_gain,
        };
        assert!(policy.settled_angle(&obs).abs() < 1e-4);
        assert_eq!(policy.act(&Observation::Landing(obs)), Some(ControlInput::none()));
    }

    #[test]
    fn test_settle_gain_follows_configured_damping() {
        let mut config = SimConfig::landing();
        config.physics.angular_damping = 0.5;
        let policy = LevelerPolicy::new(&config);
        let obs = LandingObservation {
            x: 300.0,
            altitude: 150.0,
            velocity_x: 0.0,
            velocity_y: -2.0,
            angle: 1.0,
            angular_velocity: 1.0,
        };
        assert!((policy.settled_angle(&obs) - 2.0).abs() < 1e-5);

        config.physics.angular_damping = 1.0;
        let undamped = LevelerPolicy::new(&config);
        assert_eq!(undamped.settled_angle(&obs), 1.0);
    }

    #[test]
    fn test_no_opinion_on_glide() {
        let mut policy = LevelerPolicy::new(&SimConfig::landing());
        let obs = Observation::Glide(GlideObservation {
            plane_x: 0.0,
            plane_y: 0.0,
            wind_x: 0.0,
            time_remaining: 0.0,
        });
        assert_eq!(policy.act(&obs), None);
    }
}
