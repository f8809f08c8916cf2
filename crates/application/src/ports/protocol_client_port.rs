//! Protocol client port - sending and media upload
//!
//! One client handle is shared by every request; implementations own their
//! concurrency safety and callers never lock around them.

use async_trait::async_trait;
use domain::{MediaKind, Message, RecipientAddress, UploadResult};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Acknowledgement of a sent message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Protocol message id
    pub message_id: String,
    /// Server timestamp (Unix seconds)
    pub timestamp: i64,
}

/// Port for the protocol session's outbound capabilities
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProtocolClientPort: Send + Sync {
    /// Send a message envelope to a recipient.
    ///
    /// Exactly one attempt is made. Failures are reported as
    /// [`ApplicationError::Send`].
    async fn send_message(
        &self,
        recipient: &RecipientAddress,
        message: Message,
    ) -> Result<SendReceipt, ApplicationError>;

    /// Stage media with the protocol backend.
    ///
    /// Failures are reported as [`ApplicationError::Upload`].
    async fn upload(&self, data: Vec<u8>, kind: MediaKind)
    -> Result<UploadResult, ApplicationError>;

    /// Check whether the protocol session is reachable
    async fn is_available(&self) -> bool;
}
