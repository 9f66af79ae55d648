use std::fmt;

/// Unified error type for the dispatchboard crate.
#[derive(Debug, Clone)]
pub enum CoreError {
    /// Invalid input provided by the caller.
    InvalidInput(String),
    /// The live channel transport failed to connect, send, or receive.
    Transport(String),
    /// Internal error.
    Internal(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CoreError::Transport(msg) => write!(f, "transport error: {msg}"),
            CoreError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

/// Result type alias using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
