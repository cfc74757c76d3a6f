//! Error types for the AT protocol.

use thiserror::Error;

/// Errors that can occur when building or encoding AT commands.
///
/// Decoding never fails: the codec buffers until a line break and the
/// classifier treats unrecognized text as data.
#[derive(Debug, Error)]
pub enum AtError {
    /// Invalid command format.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Command line too long for the radio's interpreter.
    #[error("command too long: max {max} bytes, got {actual}")]
    CommandTooLong { max: usize, actual: usize },
}

/// Result type alias for AT protocol operations.
pub type AtResult<T> = Result<T, AtError>;
