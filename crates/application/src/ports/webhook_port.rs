//! Webhook port - delivery of inbound messages to the backend

use async_trait::async_trait;
use domain::WebhookPayload;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Outcome of a webhook call that reached the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookDelivery {
    /// HTTP status returned by the backend
    pub status: u16,
}

/// Port for pushing payloads to the backend webhook
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebhookPort: Send + Sync {
    /// Deliver one payload. Single attempt, bounded by the adapter's timeout.
    async fn deliver(&self, payload: &WebhookPayload) -> Result<WebhookDelivery, ApplicationError>;
}
