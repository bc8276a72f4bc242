//! Error types for rcondeck
//!
//! Provides a unified error type used across all rcondeck crates.

use std::path::PathBuf;

/// Main error type for rcondeck operations
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Connection Errors ===

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Connection timeout after {seconds}s")]
    ConnectionTimeout { seconds: u64 },

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    // === Protocol Errors ===

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Authentication failed")]
    AuthFailed,

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    // === Registry Errors ===

    #[error("empty registry: no servers configured")]
    EmptyRegistry,

    // === Container Errors ===

    #[error("unknown action: {0}")]
    UnknownAction(String),

    // === Terminal Errors ===

    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl DeckError {
    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check whether this error prevents the session from starting
    ///
    /// Configuration and registry failures are fatal at startup; everything
    /// else is local to a single request.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::FileRead { .. }
                | Self::Config(_)
                | Self::ConfigInvalid { .. }
                | Self::ConfigNotFound(_)
                | Self::EmptyRegistry
                | Self::Terminal(_)
        )
    }
}

/// Result type alias using DeckError
pub type Result<T> = std::result::Result<T, DeckError>;
