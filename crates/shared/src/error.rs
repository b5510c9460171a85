//! Configuration error types.

/// Errors that can occur when loading, saving, or validating a `SimConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse JSON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize config to JSON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A parameter is outside the range the simulation accepts.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
