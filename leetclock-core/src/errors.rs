use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type used across the leetclock core crate.
pub type Result<T> = std::result::Result<T, LeetClockError>;

/// Canonical error representation shared by every leetclock crate.
#[derive(Debug, Error)]
pub enum LeetClockError {
    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("general error: {0}")]
    GeneralError(String),
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value:?}")]
    InvalidEnvVar { key: String, value: String },

    #[error("{present} is set but {missing} is not; a location needs both")]
    IncompleteLocation { present: String, missing: String },

    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Coordinate(#[from] LeetClockError),
}

impl From<ConfigError> for LeetClockError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::Coordinate(inner) => inner,
            other => LeetClockError::ConfigError(other.to_string()),
        }
    }
}
