pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::*;
pub use constants::*;
pub use error::ConfigError;
pub use types::*;
