//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (missing recipient, invalid address)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The protocol address parser rejected a device-qualified address
    #[error("invalid jid: {0}")]
    AddressParse(String),

    /// Media upload failed; carries the protocol client's message unchanged
    #[error("{0}")]
    Upload(String),

    /// Message send failed; carries the protocol client's message unchanged
    #[error("{0}")]
    Send(String),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Whether the error was caused by the caller's input rather than a
    /// downstream system
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Domain(_) | Self::AddressParse(_))
    }
}
