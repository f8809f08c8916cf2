//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Recipient was empty after normalization
    #[error("missing recipient")]
    MissingRecipient,

    /// Recipient could not be turned into an address
    #[error("invalid jid: {0}")]
    InvalidAddress(String),
}

impl DomainError {
    /// Create an invalid address error
    pub fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress(reason.into())
    }
}
