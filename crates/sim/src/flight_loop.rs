use glider_shared::*;
use tracing::{debug, warn};

use crate::episode::Episode;
use crate::error::SimError;
use crate::policy::Policy;

/// Fly one deterministic episode under `policy` and record it.
///
/// Ticks where the policy offers no action fly with neutral control and are
/// counted in `fallback_ticks`.
pub fn run_flight(config: &RunConfig, policy: &mut dyn Policy) -> Result<FlightRecord, SimError> {
    let mut episode = Episode::new(config.sim.clone(), config.seed)?;
    let mut frames = Vec::new();
    let mut obs = episode.observe();
    let mut fallback_ticks = 0u32;

    // Capture initial frame
    frames.push(episode.snapshot());

    for _ in 0..config.max_ticks {
        let input = match policy.act(&obs) {
            Some(input) => input,
            None => {
                if fallback_ticks == 0 {
                    warn!(
                        policy = policy.name(),
                        variant = %config.sim.variant,
                        tick = episode.tick(),
                        "policy produced no action; flying neutral"
                    );
                }
                fallback_ticks += 1;
                ControlInput::none()
            }
        };

        let step = episode.step(input)?;
        obs = step.observation;

        if episode.tick() % FRAME_INTERVAL == 0 {
            frames.push(episode.snapshot());
        }

        if step.terminal {
            // Capture final frame
            if episode.tick() % FRAME_INTERVAL != 0 {
                frames.push(episode.snapshot());
            }
            break;
        }
    }

    let (outcome, reason) = episode.outcome();
    debug!(
        policy = policy.name(),
        seed = config.seed,
        ?outcome,
        ticks = episode.tick(),
        fallback_ticks,
        "flight finished"
    );

    Ok(FlightRecord {
        config: config.clone(),
        frames,
        result: FlightResult {
            outcome,
            reason,
            final_tick: episode.tick(),
            total_reward: episode.total_reward(),
            stats: episode.stats(),
            fallback_ticks,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autopilots::{DodgerPolicy, LevelerPolicy};
    use crate::policy::NeutralPolicy;

    #[test]
    fn test_glide_flight_completes() {
        let config = RunConfig::default();
        let mut policy = NeutralPolicy;

        let record = run_flight(&config, &mut policy).expect("valid config");

        assert!(record.result.outcome.is_terminal());
        assert!(record.result.final_tick <= MAX_EPISODE_TICKS);
        assert_eq!(record.frames.len() as u32, record.result.final_tick + 1);
    }

    #[test]
    fn test_max_ticks_caps_unfinished_flight() {
        let config = RunConfig {
            max_ticks: 20,
            ..Default::default()
        };
        let mut policy = NeutralPolicy;

        let record = run_flight(&config, &mut policy).expect("valid config");

        assert_eq!(record.result.outcome, Outcome::Ongoing);
        assert_eq!(record.result.final_tick, 20);
        assert!(record.result.reason.is_none());
    }

    #[test]
    fn test_mismatched_policy_falls_back_to_neutral() {
        let config = RunConfig {
            sim: SimConfig::landing(),
            ..Default::default()
        };
        let mut policy = DodgerPolicy::new(&SimConfig::glide());

        let record = run_flight(&config, &mut policy).expect("valid config");

        assert_eq!(record.result.fallback_ticks, record.result.final_tick);
        assert_eq!(record.result.outcome, Outcome::Survived);
        assert_eq!(record.result.stats.impulses, 0);
    }

    #[test]
    fn test_leveler_lands_from_spawn() {
        let config = RunConfig {
            sim: SimConfig::landing(),
            policy_name: "leveler".into(),
            ..Default::default()
        };
        let mut policy = LevelerPolicy::new(&config.sim);

        let record = run_flight(&config, &mut policy).expect("valid config");

        assert_eq!(record.result.reason, Some(EndReason::Touchdown));
        assert_eq!(record.result.fallback_ticks, 0);
    }
}
