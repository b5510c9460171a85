use glider_shared::{ConfigError, Outcome};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("episode already ended ({outcome:?} at tick {tick}); reset before stepping")]
    EpisodeOver { outcome: Outcome, tick: u32 },

    #[error("expected {expected} actions, got {got}")]
    BatchSize { expected: usize, got: usize },

    #[error("unknown policy `{0}`")]
    UnknownPolicy(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
