//! Error types for the contact relay.

use thiserror::Error;

/// Common error type for the contact relay.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An address could not be parsed as a mailbox.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    /// The outgoing message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The SMTP transport failed (network, auth or protocol).
    #[error("SMTP error: {0}")]
    Transport(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lettre::transport::smtp::Error> for RelayError {
    fn from(e: lettre::transport::smtp::Error) -> Self {
        RelayError::Transport(e.to_string())
    }
}

impl From<lettre::error::Error> for RelayError {
    fn from(e: lettre::error::Error) -> Self {
        RelayError::Build(e.to_string())
    }
}

/// Result type alias for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
