//! Error types for the session daemon integration

use thiserror::Error;

/// Errors that can occur while talking to the session daemon
#[derive(Debug, Error)]
pub enum SessionError {
    /// Connection to the daemon failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// JSON-RPC protocol error
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The daemon returned an error for a call
    #[error("Session daemon error (code {code}): {message}")]
    Daemon {
        /// Error code from the daemon
        code: i32,
        /// Error message, as produced by the protocol library
        message: String,
    },

    /// Address does not follow the JID grammar
    #[error("Invalid JID: {0}")]
    InvalidJid(String),

    /// Timeout waiting for a response
    #[error("Operation timed out")]
    Timeout,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SessionError {
    /// Create a connection error
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a protocol error
    #[must_use]
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a daemon error
    #[must_use]
    pub fn daemon(code: i32, message: impl Into<String>) -> Self {
        Self::Daemon {
            code,
            message: message.into(),
        }
    }

    /// Create an invalid JID error
    #[must_use]
    pub fn invalid_jid(reason: impl Into<String>) -> Self {
        Self::InvalidJid(reason.into())
    }

    /// Message to surface to API callers.
    ///
    /// Daemon errors carry the protocol library's own message, which is
    /// returned verbatim; everything else uses the display form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Daemon { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
