//! Error types for partition store operations.

use common::EngineError;

/// Error type for partition store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid input or parameter errors. Raised before any engine access.
    InvalidArgument(String),

    /// The caller's cancellation token was cancelled before the operation
    /// was dispatched to the engine.
    OperationCancelled,

    /// Storage-related errors from the underlying engine, propagated
    /// verbatim and never retried here.
    Storage(String),

    /// Internal errors indicating bugs or invariant violations.
    Internal(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::OperationCancelled => write!(f, "Operation cancelled"),
            Error::Storage(msg) => write!(f, "Storage error: {}", msg),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Storage(msg) => Error::Storage(msg),
            EngineError::Internal(msg) => Error::Internal(msg),
        }
    }
}

/// Result type alias for partition store operations.
pub type Result<T> = std::result::Result<T, Error>;
