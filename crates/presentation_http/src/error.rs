//! API error handling
//!
//! Every error body is `{"error": "<message>"}`. Caller mistakes map to 400
//! with a fixed message; downstream failures map to 500 and carry the
//! protocol client's message.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// API error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Request body could not be bound
    #[error("Invalid request")]
    InvalidRequest,

    /// Neither `recipient` nor `phone` was supplied
    #[error("Missing recipient")]
    MissingRecipient,

    /// No `file` part was supplied
    #[error("Missing file")]
    MissingFile,

    /// The `file` part could not be read
    #[error("Failed to read file")]
    UnreadableFile,

    /// Recipient could not be resolved to an address
    #[error("Invalid JID format")]
    InvalidAddress,

    /// Upload or send failed downstream
    #[error("{0}")]
    Downstream(String),
}

impl ApiError {
    /// HTTP status for this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        if err.is_invalid_input() {
            debug!(reason = %err, "Recipient rejected");
            Self::InvalidAddress
        } else {
            Self::Downstream(err.to_string())
        }
    }
}
