//! Wire-level error type

use std::time::Duration;

use rcondeck_utils::DeckError;

/// Errors raised by the RCON codec and client
#[derive(Debug, thiserror::Error)]
pub enum RconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("packet too large: {size} bytes (max {max})")]
    PacketTooLarge { size: usize, max: usize },

    #[error("packet too small: {size} bytes (min {min})")]
    PacketTooSmall { size: usize, min: usize },

    #[error("authentication failed")]
    AuthFailed,

    #[error("unexpected packet id: expected {expected}, got {actual}")]
    UnexpectedId { expected: i32, actual: i32 },

    #[error("unexpected packet type: expected {expected}, got {actual}")]
    UnexpectedType { expected: i32, actual: i32 },

    #[error("command is empty")]
    EmptyCommand,

    #[error("command too long: {len} bytes (max {max})")]
    CommandTooLong { len: usize, max: usize },

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("connection closed by server")]
    ConnectionClosed,
}

impl RconError {
    pub(crate) fn timeout(operation: &'static str, after: Duration) -> Self {
        Self::Timeout { operation, after }
    }
}

impl From<RconError> for DeckError {
    fn from(err: RconError) -> Self {
        match err {
            RconError::Io(e) => DeckError::Io(e),
            RconError::AuthFailed => DeckError::AuthFailed,
            RconError::ConnectionClosed => DeckError::ConnectionClosed,
            RconError::Timeout { after, .. } => DeckError::ConnectionTimeout {
                seconds: after.as_secs(),
            },
            other => DeckError::protocol(other.to_string()),
        }
    }
}
