use std::time::Duration;

use glider_shared::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;
use tracing::{debug, trace};

use crate::collision;
use crate::control::{ControlEffect, ControlMapper};
use crate::error::SimError;
use crate::kinematics;
use crate::outcome::{self, Verdict};

/// One simulated flight. Owns its RNG so that a seed fully determines the run.
#[derive(Debug, Clone)]
pub struct Episode {
    pub(crate) config: SimConfig,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg64,
    pub(crate) craft: CraftState,
    pub(crate) obstacle: Option<ObstacleState>,
    pub(crate) control: ControlMapper,
    pub(crate) tick: u32,
    pub(crate) elapsed: Duration,
    pub(crate) time_remaining: Option<Duration>,
    pub(crate) verdict: Verdict,
    pub(crate) total_reward: f32,
    pub(crate) stats: EpisodeStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub tick: u32,
    pub elapsed_ms: u64,
    pub outcome: Outcome,
    pub reason: Option<EndReason>,
    pub control: ControlEffect,
    pub total_reward: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub terminal: bool,
    pub info: StepInfo,
}

impl Episode {
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = Pcg64::seed_from_u64(seed);
        let craft = spawn_craft(&mut rng, &config.craft);
        let obstacle = config
            .obstacle
            .as_ref()
            .map(|o| spawn_obstacle(&mut rng, o, &config.world));

        Ok(Self {
            control: ControlMapper::new(config.control),
            time_remaining: config.time_budget(),
            config,
            seed,
            rng,
            craft,
            obstacle,
            tick: 0,
            elapsed: Duration::ZERO,
            verdict: Verdict::ONGOING,
            total_reward: 0.0,
            stats: EpisodeStats::default(),
        })
    }

    /// Start over. `None` replays the current seed, so two resets without a
    /// seed produce identical episodes.
    pub fn reset(&mut self, seed: Option<u64>) -> Observation {
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self.rng = Pcg64::seed_from_u64(self.seed);
        self.craft = spawn_craft(&mut self.rng, &self.config.craft);
        self.obstacle = self
            .config
            .obstacle
            .as_ref()
            .map(|o| spawn_obstacle(&mut self.rng, o, &self.config.world));
        self.control = ControlMapper::new(self.config.control);
        self.tick = 0;
        self.elapsed = Duration::ZERO;
        self.time_remaining = self.config.time_budget();
        self.verdict = Verdict::ONGOING;
        self.total_reward = 0.0;
        self.stats = EpisodeStats::default();
        self.observe()
    }

    /// Advance one tick of the configured length.
    pub fn step(&mut self, input: ControlInput) -> Result<StepResult, SimError> {
        let dt = self.config.tick();
        self.step_for(dt, input)
    }

    /// Advance one tick of `dt` simulated time. Motion is per tick; `dt`
    /// drives the clock, the timer and the thrust rate limiter.
    pub fn step_for(&mut self, dt: Duration, input: ControlInput) -> Result<StepResult, SimError> {
        if self.verdict.outcome.is_terminal() {
            return Err(SimError::EpisodeOver {
                outcome: self.verdict.outcome,
                tick: self.tick,
            });
        }

        let now = self.elapsed.saturating_add(dt);
        let effect = self.control.apply(&mut self.craft, input, now);
        match effect {
            ControlEffect::Impulse => self.stats.impulses += 1,
            ControlEffect::RateLimited => self.stats.rate_limited += 1,
            ControlEffect::Idle | ControlEffect::Displaced => {}
        }

        kinematics::integrate(&mut self.craft, &self.config.physics);
        self.apply_gust();
        self.advance_obstacle();

        let detect_ground = self.config.landing.is_some();
        let contact = collision::resolve(&mut self.craft, &self.config, self.obstacle.as_ref(), detect_ground);

        self.elapsed = now;
        self.tick += 1;
        if let Some(remaining) = self.time_remaining.as_mut() {
            *remaining = remaining.saturating_sub(dt);
        }

        let verdict = outcome::classify(
            &contact,
            &self.craft,
            self.config.landing.as_ref(),
            self.time_remaining,
        );
        let reward = outcome::tick_reward(&verdict, &self.craft, &self.config);
        self.total_reward += reward;
        self.verdict = verdict;

        let terminal = verdict.outcome.is_terminal();
        if terminal {
            debug!(
                variant = %self.config.variant,
                seed = self.seed,
                tick = self.tick,
                outcome = ?verdict.outcome,
                reason = ?verdict.reason,
                total_reward = self.total_reward,
                "episode ended"
            );
        }

        Ok(StepResult {
            observation: self.observe(),
            reward,
            terminal,
            info: StepInfo {
                tick: self.tick,
                elapsed_ms: self.elapsed.as_millis() as u64,
                outcome: verdict.outcome,
                reason: verdict.reason,
                control: effect,
                total_reward: self.total_reward,
            },
        })
    }

    fn apply_gust(&mut self) {
        let Some(wind) = self.config.wind else {
            return;
        };
        if self.rng.gen_bool(wind.gust_probability) {
            let direction = if self.rng.gen::<bool>() { 1.0 } else { -1.0 };
            self.craft.velocity.x += direction * wind.gust_strength;
            self.stats.gusts += 1;
        }
    }

    fn advance_obstacle(&mut self) {
        let (Some(obstacle), Some(cfg)) = (self.obstacle.as_mut(), self.config.obstacle.as_ref()) else {
            return;
        };
        obstacle.position.y -= cfg.fall_speed;
        // Respawn once the whole box has passed below the world.
        if obstacle.position.y + cfg.height < 0.0 {
            *obstacle = spawn_obstacle(&mut self.rng, cfg, &self.config.world);
            self.stats.respawns += 1;
            trace!(tick = self.tick, x = obstacle.position.x, "obstacle respawned");
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.verdict.outcome.is_terminal()
    }

    pub fn outcome(&self) -> (Outcome, Option<EndReason>) {
        (self.verdict.outcome, self.verdict.reason)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn craft(&self) -> &CraftState {
        &self.craft
    }

    pub fn obstacle(&self) -> Option<&ObstacleState> {
        self.obstacle.as_ref()
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining
    }

    pub fn total_reward(&self) -> f32 {
        self.total_reward
    }

    pub fn stats(&self) -> EpisodeStats {
        self.stats
    }

    pub fn snapshot(&self) -> Frame {
        Frame {
            tick: self.tick,
            craft: CraftSnapshot::from(&self.craft),
            obstacle: self.obstacle.as_ref().map(ObstacleSnapshot::from),
            time_remaining: self.time_remaining.map(|t| t.as_secs_f32()),
        }
    }
}

fn spawn_craft(rng: &mut Pcg64, cfg: &CraftConfig) -> CraftState {
    let mut position = cfg.spawn;
    if cfg.spawn_jitter_x > 0.0 {
        position.x += rng.gen_range(-cfg.spawn_jitter_x..=cfg.spawn_jitter_x);
    }
    CraftState::new(position, cfg.initial_velocity)
}

/// New obstacle just above the top of the world.
fn spawn_obstacle(rng: &mut Pcg64, cfg: &ObstacleConfig, world: &WorldConfig) -> ObstacleState {
    let x = rng.gen_range(cfg.spawn_x_min..cfg.spawn_x_max);
    ObstacleState {
        position: glam::Vec2::new(x, world.height + cfg.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn glide(seed: u64) -> Episode {
        Episode::new(SimConfig::glide(), seed).expect("glide preset is valid")
    }

    #[test]
    fn test_initial_state() {
        let ep = glide(1);
        assert_eq!(ep.tick(), 0);
        assert_eq!(ep.craft().position, Vec2::new(GLIDE_SPAWN_X, GLIDE_SPAWN_Y));
        assert_eq!(ep.time_remaining(), Some(Duration::from_secs(EPISODE_SECS)));
        assert!(!ep.is_terminal());

        let obstacle = ep.obstacle().expect("glide has an obstacle");
        assert!(obstacle.position.x >= OBSTACLE_SPAWN_X_MIN && obstacle.position.x < OBSTACLE_SPAWN_X_MAX);
        assert_eq!(obstacle.position.y, GLIDE_WORLD_HEIGHT + OBSTACLE_SIZE);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SimConfig::landing();
        config.physics.angular_damping = 2.0;
        assert!(matches!(Episode::new(config, 0), Err(SimError::Config(_))));
    }

    #[test]
    fn test_neutral_glide_sinks_at_descent_rate() {
        let mut ep = glide(3);
        ep.step(ControlInput::none()).expect("first step");
        assert_eq!(ep.craft().position.y, GLIDE_SPAWN_Y - GLIDE_DESCENT_RATE);
        assert_eq!(ep.craft().position.x, GLIDE_SPAWN_X);
    }

    #[test]
    fn test_timer_counts_down_per_tick() {
        let mut ep = glide(3);
        ep.step(ControlInput::none()).expect("step");
        ep.step(ControlInput::none()).expect("step");
        assert_eq!(ep.elapsed(), Duration::from_millis(2 * DEFAULT_TICK_MS));
        assert_eq!(
            ep.time_remaining(),
            Some(Duration::from_millis(EPISODE_SECS * 1000 - 2 * DEFAULT_TICK_MS))
        );
    }

    #[test]
    fn test_glide_timeout_pays_survival_bonus() {
        let mut ep = glide(5);
        // Keep the obstacle out of reach so only the timer can end the run.
        let mut last = None;
        for _ in 0..MAX_EPISODE_TICKS {
            if let Some(o) = ep.obstacle.as_mut() {
                o.position = Vec2::new(0.0, 1000.0);
            }
            last = Some(ep.step(ControlInput::none()).expect("ongoing"));
        }
        let last = last.expect("at least one step");

        assert!(last.terminal);
        assert_eq!(last.info.reason, Some(EndReason::Timeout));
        assert_eq!(last.reward, AIRBORNE_REWARD + SURVIVAL_BONUS);
        assert_eq!(ep.tick(), MAX_EPISODE_TICKS);
        let expected_total = MAX_EPISODE_TICKS as f32 * AIRBORNE_REWARD + SURVIVAL_BONUS;
        assert!((ep.total_reward() - expected_total).abs() < 1e-3);
    }

    #[test]
    fn test_step_after_end_fails_without_mutation() {
        let mut ep = glide(7);
        ep.craft.position = Vec2::new(100.0, 100.0);
        ep.obstacle = Some(ObstacleState {
            position: Vec2::new(110.0, 110.0),
        });

        let result = ep.step(ControlInput::none()).expect("collision tick");
        assert!(result.terminal);
        assert_eq!(result.reward, CRASH_PENALTY);

        let before = ep.snapshot();
        let reward_before = ep.total_reward();
        let err = ep.step(Action::Left.into()).unwrap_err();
        assert!(matches!(err, SimError::EpisodeOver { outcome: Outcome::Crashed, .. }));
        assert_eq!(ep.snapshot().craft, before.craft);
        assert_eq!(ep.tick(), before.tick);
        assert_eq!(ep.total_reward(), reward_before);
    }

    #[test]
    fn test_reset_replays_same_seed() {
        let mut ep = glide(11);
        let first_obstacle = *ep.obstacle().expect("obstacle");
        for _ in 0..20 {
            ep.step(Action::Right.into()).expect("step");
        }

        ep.reset(None);

        assert_eq!(ep.tick(), 0);
        assert_eq!(ep.total_reward(), 0.0);
        assert_eq!(*ep.obstacle().expect("obstacle"), first_obstacle);
    }

    #[test]
    fn test_reset_with_new_seed_changes_obstacle() {
        let mut ep = glide(11);
        let a = ep.obstacle().expect("obstacle").position.x;
        let distinct = (12..40).any(|seed| {
            ep.reset(Some(seed));
            ep.obstacle().expect("obstacle").position.x != a
        });
        assert!(distinct, "reseeding should move the obstacle spawn");
    }

    #[test]
    fn test_obstacle_respawns_after_passing_ground() {
        let mut ep = glide(13);
        ep.craft.position = Vec2::new(0.0, 0.0);
        ep.obstacle = Some(ObstacleState {
            position: Vec2::new(300.0, -OBSTACLE_SIZE + 1.0),
        });

        ep.step(ControlInput::none()).expect("step");

        assert_eq!(ep.stats().respawns, 1);
        let obstacle = ep.obstacle().expect("obstacle");
        assert_eq!(obstacle.position.y, GLIDE_WORLD_HEIGHT + OBSTACLE_SIZE);
    }

    #[test]
    fn test_gusts_only_touch_horizontal_velocity() {
        let mut config = SimConfig::momentum_glide();
        if let Some(wind) = config.wind.as_mut() {
            wind.gust_probability = 1.0;
        }
        let mut ep = Episode::new(config, 17).expect("valid");

        ep.step(ControlInput::none()).expect("step");

        assert_eq!(ep.stats().gusts, 1);
        assert!((ep.craft().velocity.x.abs() - GUST_STRENGTH).abs() < 1e-6);
        assert!((ep.craft().velocity.y + MOMENTUM_GRAVITY).abs() < 1e-6);
    }

    #[test]
    fn test_landing_neutral_touchdown_survives() {
        let mut ep = Episode::new(SimConfig::landing(), 0).expect("valid");
        let mut last = None;
        for _ in 0..MAX_RUN_TICKS {
            let result = ep.step(ControlInput::none()).expect("ongoing");
            let done = result.terminal;
            last = Some(result);
            if done {
                break;
            }
        }
        let last = last.expect("stepped");

        assert_eq!(last.info.outcome, Outcome::Survived);
        assert_eq!(last.info.reason, Some(EndReason::Touchdown));
        assert_eq!(last.reward, LANDING_BONUS);
        assert_eq!(ep.craft().position.y, LANDING_GROUND_LEVEL);
    }

    #[test]
    fn test_touchdown_on_the_ground_line_stops_descent() {
        let mut config = SimConfig::landing();
        config.physics.gravity = 0.0;
        config.physics.drag_y = 1.0;
        let mut ep = Episode::new(config, 0).expect("valid");
        ep.craft.position.y = LANDING_GROUND_LEVEL + 1.0;
        ep.craft.velocity.y = -1.0;

        let result = ep.step(ControlInput::none()).expect("step");

        assert!(result.terminal);
        assert_eq!(result.info.reason, Some(EndReason::Touchdown));
        assert_eq!(ep.craft().position.y, LANDING_GROUND_LEVEL);
        assert_eq!(ep.craft().velocity.y, 0.0);
    }

    #[test]
    fn test_landing_tilted_touchdown_crashes() {
        let mut ep = Episode::new(SimConfig::landing(), 0).expect("valid");
        ep.craft.position.y = 0.1;
        ep.craft.angle = LANDING_ANGLE_TOLERANCE_DEG;

        let result = ep.step(ControlInput::none()).expect("step");

        assert!(result.terminal);
        assert_eq!(result.info.reason, Some(EndReason::HardLanding));
        assert_eq!(result.reward, CRASH_PENALTY);
    }

    #[test]
    fn test_landing_drift_past_margin_crashes() {
        let mut ep = Episode::new(SimConfig::landing(), 0).expect("valid");
        ep.craft.position.x = -LANDING_LATERAL_MARGIN + 0.1;
        ep.craft.velocity.x = -1.0;

        let result = ep.step(ControlInput::none()).expect("step");

        assert_eq!(result.info.reason, Some(EndReason::OutOfBounds));
    }

    #[test]
    fn test_huge_tick_saturates_the_clock() {
        let mut ep = Episode::new(SimConfig::landing(), 0).expect("valid");

        ep.step_for(Duration::MAX, ControlInput::left_engine()).expect("first tick");
        let result = ep
            .step_for(Duration::from_millis(1), ControlInput::left_engine())
            .expect("clock saturates instead of overflowing");

        assert!(!result.terminal);
        assert_eq!(ep.elapsed(), Duration::MAX);
        assert_eq!(ep.tick(), 2);
        assert_eq!(ep.stats().impulses, 1);
        assert_eq!(ep.stats().rate_limited, 1);
    }

    #[test]
    fn test_rate_limited_thrust_is_counted() {
        let mut ep = Episode::new(SimConfig::landing(), 0).expect("valid");
        let dt = Duration::from_millis(10);
        for _ in 0..20 {
            ep.step_for(dt, ControlInput::left_engine()).expect("step");
        }
        let stats = ep.stats();
        assert_eq!(stats.impulses, 4);
        assert_eq!(stats.rate_limited, 16);
        assert!(stats.impulses as u128 <= ep.elapsed().as_millis() / THRUST_MIN_INTERVAL_MS as u128);
    }
}
