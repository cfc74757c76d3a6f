//! Error types for session operations.

use rfdconf_protocol::AtError;
use rfdconf_registry::ValidateError;
use thiserror::Error;

/// Errors that can occur while driving a radio configuration session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Could not reach command mode; the session is unusable until the
    /// caller reconnects.
    #[error("failed to enter command mode after {attempts} attempts")]
    ModeEntryFailed {
        /// Number of escape-sequence attempts made.
        attempts: u32,
    },

    /// The parameter name is not in the registry.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Client-side range check failed; nothing was sent to the radio.
    #[error("{name} value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// The radio answered `ERROR`.
    #[error("radio rejected '{command}': {response}")]
    CommandRejected {
        /// The command that was rejected.
        command: String,
        /// Data lines received before the `ERROR` status, joined.
        response: String,
    },

    /// No terminal status arrived within the read timeout.
    #[error("no response to '{command}' within timeout")]
    CommandTimeout {
        /// The command that went unanswered.
        command: String,
    },

    /// The radio answered `OK` but the payload made no sense.
    #[error("unexpected response to '{command}': {response}")]
    UnexpectedResponse {
        /// The command.
        command: String,
        /// The raw data lines, joined.
        response: String,
    },

    /// The channel produced an unbroken stream of non-status lines; message
    /// boundaries can no longer be trusted. The session is forced back to
    /// `Disconnected` and the caller must reconnect.
    #[error("protocol desync after {lines} unterminated lines; reconnect required")]
    ProtocolDesync {
        /// Number of data lines accumulated before giving up.
        lines: usize,
    },

    /// Operation requires command mode but the session is not in it.
    #[error("not in command mode")]
    NotConnected,

    /// Malformed command (raw commands only).
    #[error(transparent)]
    InvalidCommand(#[from] AtError),

    /// Underlying transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl From<ValidateError> for SessionError {
    fn from(err: ValidateError) -> Self {
        match err {
            ValidateError::NotFound(name) => SessionError::UnknownParameter(name),
            ValidateError::OutOfRange {
                name,
                value,
                min,
                max,
            } => SessionError::OutOfRange {
                name,
                value,
                min,
                max,
            },
        }
    }
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
