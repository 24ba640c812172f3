//! Configuration error types

use thiserror::Error;

/// Error type for outline configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An integer discriminant that maps to no enum variant.
    #[error("Unmapped {kind} value: {value}")]
    UnmappedEnum { kind: &'static str, value: i32 },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Failed to parse settings: {0}")]
    Parse(String),

    #[error("Failed to serialize settings: {0}")]
    Serialize(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
