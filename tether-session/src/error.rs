//! Error types for session operations

use std::io;

use tether_core::{AttachError, ConfigError};
use thiserror::Error;

/// Transport error
#[derive(Error, Debug)]
pub enum TransportError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event could not be encoded
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    /// Transport has been unbound
    #[error("Transport is unbound")]
    Unbound,
}

/// Session error
#[derive(Error, Debug)]
pub enum SessionError {
    /// Surface could not be mounted
    #[error("Failed to attach terminal: {0}")]
    Attach(#[from] AttachError),

    /// Configuration was unavailable at session start
    #[error("Configuration unavailable: {0}")]
    Config(#[from] ConfigError),

    /// Transport failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
