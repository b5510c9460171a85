use std::time::Duration;

use glider_shared::*;

use crate::collision::Contact;

/// Result of classifying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub reason: Option<EndReason>,
}

impl Verdict {
    pub const ONGOING: Verdict = Verdict {
        outcome: Outcome::Ongoing,
        reason: None,
    };

    fn ended(outcome: Outcome, reason: EndReason) -> Self {
        Self {
            outcome,
            reason: Some(reason),
        }
    }
}

/// Touchdown is soft only when both limits hold strictly.
pub fn is_soft_touchdown(craft: &CraftState, landing: &LandingConfig) -> bool {
    craft.angle.abs() < landing.angle_tolerance_deg
        && craft.velocity.x.abs() < landing.speed_tolerance
}

/// Decide the outcome after the world has been resolved and the timer advanced.
///
/// Precedence: collision or lateral excursion, then ground contact, then the
/// timer. A crash on the last tick of the budget is still a crash.
pub fn classify(
    contact: &Contact,
    craft: &CraftState,
    landing: Option<&LandingConfig>,
    time_remaining: Option<Duration>,
) -> Verdict {
    if contact.collision {
        return Verdict::ended(Outcome::Crashed, EndReason::Collision);
    }
    if contact.out_of_bounds {
        return Verdict::ended(Outcome::Crashed, EndReason::OutOfBounds);
    }
    if contact.grounded {
        if let Some(landing) = landing {
            return if is_soft_touchdown(craft, landing) {
                Verdict::ended(Outcome::Survived, EndReason::Touchdown)
            } else {
                Verdict::ended(Outcome::Crashed, EndReason::HardLanding)
            };
        }
    }
    if time_remaining == Some(Duration::ZERO) {
        return Verdict::ended(Outcome::Survived, EndReason::Timeout);
    }
    Verdict::ONGOING
}

/// Reward for the tick that produced `verdict`.
pub fn tick_reward(verdict: &Verdict, craft: &CraftState, config: &SimConfig) -> f32 {
    let reward = &config.reward;
    if verdict.outcome == Outcome::Crashed {
        return reward.crash_penalty;
    }

    let altitude_frac = (craft.altitude() / config.world.height).clamp(0.0, 1.0);
    let airborne = reward.airborne + reward.altitude_bonus * altitude_frac;

    match verdict.reason {
        Some(EndReason::Timeout) => airborne + reward.survival_bonus,
        Some(EndReason::Touchdown) => airborne + reward.landing_bonus,
        _ => airborne,
    }
}
