//! Error types for theme lookup and option handling

use thiserror::Error;

/// Theme lookup error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// No theme registered under this name
    #[error("Unknown theme: {0}")]
    Unknown(String),
}

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Configuration source could not be read
    #[error("Failed to read configuration: {0}")]
    Read(String),

    /// Configuration could not be written back
    #[error("Failed to write configuration: {0}")]
    Write(String),

    /// Configuration source could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A field holds an out-of-range value
    #[error("Config error in '{field}': {message}")]
    Invalid { field: &'static str, message: String },

    /// A color string is not in a supported notation
    #[error("Invalid color '{0}'. Expected #RRGGBB, #RRGGBBAA or rgba(r, g, b, a)")]
    InvalidColor(String),
}

/// Result type for option handling
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Surface could not be mounted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// The host has no container to mount into
    #[error("Terminal container is missing")]
    MissingContainer,
}
