use thiserror::Error;

/// Request validation failures. All of these are raised before any world
/// scan or file write happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("blueprint name must not be empty")]
    EmptyName,

    #[error("blueprint name is {len} characters long (maximum {max})")]
    NameTooLong { len: usize, max: usize },

    #[error("region volume {volume} exceeds the capture limit of {max}")]
    OversizeRegion { volume: u64, max: u64 },

    #[error("dimension '{0}' is not allowed")]
    DimensionNotAllowed(String),
}

/// Errors raised while reading or writing the RON config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config RON: {0}")]
    Parse(String),

    #[error("failed to serialize config RON: {0}")]
    Serialize(String),
}
