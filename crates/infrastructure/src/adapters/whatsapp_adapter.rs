//! WhatsApp session adapter
//!
//! Implements the protocol client, address parser and event source ports on
//! top of the session daemon client.

use application::error::ApplicationError;
use application::ports::{AddressParserPort, EventSourcePort, ProtocolClientPort, SendReceipt};
use async_trait::async_trait;
use domain::{MediaKind, Message, RecipientAddress, SessionEvent, UploadResult};
use integration_whatsapp::{SessionClient, SessionClientConfig, SessionError, parse_jid};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Adapter exposing a [`SessionClient`] through the application ports
pub struct WhatsAppSessionAdapter {
    client: SessionClient,
}

impl WhatsAppSessionAdapter {
    /// Create a new adapter for the given daemon configuration
    #[must_use]
    pub fn new(config: SessionClientConfig) -> Self {
        Self {
            client: SessionClient::new(config),
        }
    }

    /// Get a reference to the underlying client
    #[must_use]
    pub const fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Drop the shared daemon connection
    pub async fn close(&self) {
        self.client.close().await;
    }
}

impl std::fmt::Debug for WhatsAppSessionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppSessionAdapter")
            .field("socket_path", &self.client.socket_path())
            .finish_non_exhaustive()
    }
}

fn map_parse_error(err: SessionError) -> ApplicationError {
    match err {
        SessionError::InvalidJid(reason) => ApplicationError::AddressParse(reason),
        other => ApplicationError::AddressParse(other.to_string()),
    }
}

#[async_trait]
impl ProtocolClientPort for WhatsAppSessionAdapter {
    #[instrument(skip(self, message), fields(recipient = %recipient))]
    async fn send_message(
        &self,
        recipient: &RecipientAddress,
        message: Message,
    ) -> Result<SendReceipt, ApplicationError> {
        let result = self
            .client
            .send_message(recipient, &message)
            .await
            .map_err(|e| ApplicationError::Send(e.user_message()))?;

        debug!(message_id = %result.id, "Message sent");
        Ok(SendReceipt {
            message_id: result.id,
            timestamp: result.timestamp,
        })
    }

    #[instrument(skip(self, data), fields(size = data.len(), kind = kind.as_str()))]
    async fn upload(
        &self,
        data: Vec<u8>,
        kind: MediaKind,
    ) -> Result<UploadResult, ApplicationError> {
        let upload = self
            .client
            .upload(&data, kind)
            .await
            .map_err(|e| ApplicationError::Upload(e.user_message()))?;

        debug!(direct_path = %upload.direct_path, "Media uploaded");
        Ok(upload)
    }

    async fn is_available(&self) -> bool {
        self.client.is_available().await
    }
}

impl AddressParserPort for WhatsAppSessionAdapter {
    fn parse_address(&self, address: &str) -> Result<RecipientAddress, ApplicationError> {
        parse_jid(address).map_err(map_parse_error)
    }
}

#[async_trait]
impl EventSourcePort for WhatsAppSessionAdapter {
    async fn subscribe(&self) -> Result<mpsc::Receiver<SessionEvent>, ApplicationError> {
        self.client.subscribe().await.map_err(|e| {
            ApplicationError::ExternalService(format!("Session subscription failed: {e}"))
        })
    }
}
