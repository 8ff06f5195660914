//! Error types for langbridge.

use thiserror::Error;

/// Main error type for all bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// I/O error on either endpoint.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error (malformed header, broken reply discipline, etc.).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Gave up connecting to the engine channel.
    #[error("Engine connect timed out after {0:?}")]
    ConnectTimeout(std::time::Duration),
}

/// Result type alias using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;
