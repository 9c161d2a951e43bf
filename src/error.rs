//! Error types for configuration loading and control input using `thiserror`.

use thiserror::Error;

/// Configuration loading/validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config document is not valid JSON for `SimConfig`
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config parsed but violates a constraint
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Rejected control input. The previous launch parameters are kept.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    #[error("Velocity must be non-negative, got {0}")]
    NegativeVelocity(f64),

    #[error("Velocity must be finite, got {0}")]
    NonFiniteVelocity(f64),

    #[error("Angle must be finite, got {0}")]
    NonFiniteAngle(f64),

    /// Launch parameters are frozen while a launch is playing
    #[error("Launch parameters are locked during playback")]
    Locked,
}
