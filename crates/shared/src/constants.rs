// Tick
pub const DEFAULT_TICK_MS: u64 = 100;
pub const TICKS_PER_SECOND: u32 = (1000 / DEFAULT_TICK_MS) as u32;

// Episode
pub const EPISODE_SECS: u64 = 15;
pub const MAX_EPISODE_TICKS: u32 = TICKS_PER_SECOND * EPISODE_SECS as u32; // 150

// Glide world (altitude-up: y=0 is the ground)
pub const GLIDE_WORLD_WIDTH: f32 = 360.0;
pub const GLIDE_WORLD_HEIGHT: f32 = 560.0;
pub const GLIDE_SPAWN_X: f32 = 180.0;
pub const GLIDE_SPAWN_Y: f32 = 550.0;
pub const GLIDE_CRAFT_WIDTH: f32 = 40.0;
pub const GLIDE_CRAFT_HEIGHT: f32 = 20.0;

// Direct-displacement control (per tick)
pub const GLIDE_LATERAL_STEP: f32 = 8.0;
pub const GLIDE_CLIMB_STEP: f32 = 5.0;
pub const GLIDE_DIVE_STEP: f32 = 3.0;
pub const GLIDE_DESCENT_RATE: f32 = 5.0;

// Obstacle ("wind")
pub const OBSTACLE_SIZE: f32 = 30.0;
pub const GLIDE_OBSTACLE_FALL_SPEED: f32 = 5.0;
pub const MOMENTUM_OBSTACLE_FALL_SPEED: f32 = 2.0;
pub const OBSTACLE_SPAWN_X_MIN: f32 = 0.0;
pub const OBSTACLE_SPAWN_X_MAX: f32 = 350.0;

// Momentum glide
pub const MOMENTUM_WORLD_WIDTH: f32 = 400.0;
pub const MOMENTUM_WORLD_HEIGHT: f32 = 600.0;
pub const MOMENTUM_SPAWN_X: f32 = 200.0;
pub const MOMENTUM_SPAWN_Y: f32 = 550.0;
pub const MOMENTUM_GRAVITY: f32 = 0.05;
pub const MOMENTUM_LATERAL_THRUST: f32 = 0.03;
pub const MOMENTUM_VERTICAL_THRUST: f32 = 0.05;
pub const GUST_PROBABILITY: f64 = 0.1;
pub const GUST_STRENGTH: f32 = 0.02;

// Balance landing
pub const LANDING_WORLD_WIDTH: f32 = 600.0;
pub const LANDING_WORLD_HEIGHT: f32 = 400.0;
pub const LANDING_GROUND_LEVEL: f32 = 0.0;
pub const LANDING_LATERAL_MARGIN: f32 = 100.0;
pub const LANDING_SPAWN_X: f32 = 300.0;
pub const LANDING_SPAWN_Y: f32 = 270.0;
pub const LANDING_INITIAL_DESCENT: f32 = 0.25;
pub const LANDING_CRAFT_WIDTH: f32 = 80.0;
pub const LANDING_CRAFT_HEIGHT: f32 = 30.0;
pub const LANDING_GRAVITY: f32 = 0.025;
pub const LANDING_DRAG_X: f32 = 0.985;
pub const LANDING_DRAG_Y: f32 = 0.995;
pub const LANDING_ANGULAR_DAMPING: f32 = 0.97;
pub const LANDING_LATERAL_THRUST: f32 = 0.35;
pub const LANDING_TORQUE: f32 = 1.0;
pub const THRUST_MIN_INTERVAL_MS: u64 = 50;
pub const LANDING_ANGLE_TOLERANCE_DEG: f32 = 7.0;
pub const LANDING_SPEED_TOLERANCE: f32 = 1.2;

// Rewards
pub const CRASH_PENALTY: f32 = -10.0;
pub const SURVIVAL_BONUS: f32 = 5.0;
pub const LANDING_BONUS: f32 = 10.0;
pub const AIRBORNE_REWARD: f32 = 1.0;
pub const MOMENTUM_ALTITUDE_BONUS: f32 = 0.5;

// Observation
pub const GLIDE_OBS_SIZE: usize = 4;
pub const MOMENTUM_OBS_SIZE: usize = 6;
pub const LANDING_OBS_SIZE: usize = 6;
pub const DISCRETE_ACTION_COUNT: usize = 5;

// Frame recording
pub const FRAME_INTERVAL: u32 = 1;

// Runner safety cap for variants without a time budget
pub const MAX_RUN_TICKS: u32 = 10_000;
