//! Protocol error types

use thiserror::Error;

/// Errors produced while parsing or validating protocol types
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Unrecognized log level name
    #[error("invalid log level: {0}")]
    InvalidLevel(String),
}
