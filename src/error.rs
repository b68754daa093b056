//! Error types for Confetti.
//!
//! Only configuration can fail. The per-frame simulation step never returns
//! an error: degenerate math short-circuits and out-of-world spawns are
//! silently ignored.

use std::fmt;

/// Errors raised while loading or validating a [`SandboxConfig`](crate::SandboxConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// World width or height is not a positive finite number.
    NonPositiveWorld { width: f32, height: f32 },
    /// Rectangle width or height is not a positive finite number.
    NonPositiveSize { width: f32, height: f32 },
    /// Trig table step would not produce a usable table.
    InvalidTableStep(f32),
    /// A field that must be non-negative (or strictly positive) is not.
    InvalidValue { field: &'static str, value: f32 },
    /// Spawn count or entity cap is zero.
    ZeroCount(&'static str),
    /// Failed to parse JSON.
    Parse(serde_json::Error),
    /// Failed to read or write a config file.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveWorld { width, height } => {
                write!(f, "World size must be positive, got {}x{}", width, height)
            }
            ConfigError::NonPositiveSize { width, height } => {
                write!(f, "Rectangle size must be positive, got {}x{}", width, height)
            }
            ConfigError::InvalidTableStep(step) => {
                write!(f, "Trig table step must be in (0, pi/2], got {}", step)
            }
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value for `{}`: {}", field, value)
            }
            ConfigError::ZeroCount(field) => write!(f, "`{}` must be at least 1", field),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// Errors that can occur when building a sandbox.
#[derive(Debug)]
pub enum SandboxError {
    /// Configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxError::Config(e) => write!(f, "Invalid sandbox configuration: {}", e),
        }
    }
}

impl std::error::Error for SandboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SandboxError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SandboxError {
    fn from(e: ConfigError) -> Self {
        SandboxError::Config(e)
    }
}
