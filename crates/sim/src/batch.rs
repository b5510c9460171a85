use glider_shared::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use serde::Serialize;

use crate::episode::Episode;
use crate::error::SimError;

/// Per-env result of a batch step.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStep {
    /// Next observation. For an env that just finished this is the first
    /// observation of its replacement episode.
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub outcome: Outcome,
    pub reason: Option<EndReason>,
    /// Last observation of the finished episode, present only when `done`.
    pub terminal_observation: Option<Observation>,
}

/// Many episodes of one variant stepped in parallel, for training loops.
///
/// Finished envs restart on their own with fresh seeds drawn from the batch
/// RNG, so the whole batch is reproducible from one seed.
pub struct BatchEnv {
    envs: Vec<Episode>,
    rng: Pcg64,
    action_repeat: u32,
}

impl BatchEnv {
    pub fn new(config: SimConfig, n_envs: usize, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = Pcg64::seed_from_u64(seed);
        let envs = (0..n_envs)
            .map(|_| Episode::new(config.clone(), rng.gen::<u64>()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            envs,
            rng,
            action_repeat: 1,
        })
    }

    pub fn len(&self) -> usize {
        self.envs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envs.is_empty()
    }

    pub fn obs_size(&self) -> usize {
        self.envs
            .first()
            .map_or(0, |env| env.config().variant.obs_size())
    }

    pub fn action_repeat(&self) -> u32 {
        self.action_repeat
    }

    /// Physics ticks per batch step, at least one.
    pub fn set_action_repeat(&mut self, value: u32) {
        self.action_repeat = value.max(1);
    }

    pub fn envs(&self) -> &[Episode] {
        &self.envs
    }

    /// Reseed and restart every env.
    pub fn reset(&mut self) -> Vec<Observation> {
        // Seeds are drawn sequentially so results do not depend on thread count.
        let seeds: Vec<u64> = (0..self.envs.len()).map(|_| self.rng.gen::<u64>()).collect();

        self.envs
            .par_iter_mut()
            .zip(seeds.into_par_iter())
            .map(|(env, seed)| env.reset(Some(seed)))
            .collect()
    }

    /// Step every env with its own input, repeating it `action_repeat` ticks.
    pub fn step(&mut self, inputs: &[ControlInput]) -> Result<Vec<BatchStep>, SimError> {
        if inputs.len() != self.envs.len() {
            return Err(SimError::BatchSize {
                expected: self.envs.len(),
                got: inputs.len(),
            });
        }

        let repeat = self.action_repeat;
        let results: Vec<BatchStep> = self
            .envs
            .par_iter_mut()
            .zip(inputs.par_iter())
            .map(|(env, input)| step_repeat(env, *input, repeat))
            .collect::<Result<_, _>>()?;

        let reset_seeds: Vec<Option<u64>> = results
            .iter()
            .map(|r| r.done.then(|| self.rng.gen::<u64>()))
            .collect();

        let results: Vec<BatchStep> = self
            .envs
            .par_iter_mut()
            .zip(results.into_par_iter())
            .zip(reset_seeds.into_par_iter())
            .map(|((env, mut result), seed)| {
                if let Some(seed) = seed {
                    let fresh = env.reset(Some(seed));
                    result.terminal_observation = Some(std::mem::replace(&mut result.observation, fresh));
                }
                result
            })
            .collect();

        Ok(results)
    }
}

fn step_repeat(env: &mut Episode, input: ControlInput, repeat: u32) -> Result<BatchStep, SimError> {
    let mut reward = 0.0;
    let mut last = env.step(input)?;
    reward += last.reward;
    for _ in 1..repeat {
        if last.terminal {
            break;
        }
        last = env.step(input)?;
        reward += last.reward;
    }

    Ok(BatchStep {
        observation: last.observation,
        reward,
        done: last.terminal,
        outcome: last.info.outcome,
        reason: last.info.reason,
        terminal_observation: None,
    })
}
