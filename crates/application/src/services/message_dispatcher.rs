//! Outbound message dispatch
//!
//! Text is sent in a single call. Audio is uploaded first and the resulting
//! media references are used to build the audio message; nothing is sent if
//! the upload fails. No call is retried.

use std::fmt;
use std::sync::Arc;

use domain::{AudioMessage, MediaKind, Message, OutboundAudio, OutboundText};
use tracing::{debug, instrument};

use crate::error::ApplicationError;
use crate::ports::{ProtocolClientPort, SendReceipt};

/// Sends outbound messages through the shared protocol client
pub struct MessageDispatcher {
    client: Arc<dyn ProtocolClientPort>,
}

impl fmt::Debug for MessageDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDispatcher").finish_non_exhaustive()
    }
}

impl MessageDispatcher {
    pub fn new(client: Arc<dyn ProtocolClientPort>) -> Self {
        Self { client }
    }

    /// Send a text message
    #[instrument(skip(self, message), fields(recipient = %message.recipient, body_len = message.body.len()))]
    pub async fn send_text(&self, message: OutboundText) -> Result<SendReceipt, ApplicationError> {
        let receipt = self
            .client
            .send_message(&message.recipient, Message::text(message.body))
            .await?;

        debug!(message_id = %receipt.message_id, "Text message sent");
        Ok(receipt)
    }

    /// Upload an audio file and send it
    #[instrument(
        skip(self, message),
        fields(
            recipient = %message.recipient,
            audio_size = message.bytes.len(),
            mime_type = %message.mime_type,
            voice_note = message.is_voice_note,
        )
    )]
    pub async fn send_audio(&self, message: OutboundAudio) -> Result<SendReceipt, ApplicationError> {
        let OutboundAudio {
            recipient,
            bytes,
            mime_type,
            is_voice_note,
        } = message;

        let upload = self.client.upload(bytes, MediaKind::Audio).await?;
        debug!(
            direct_path = %upload.direct_path,
            file_length = upload.file_length,
            "Audio uploaded"
        );

        let audio = AudioMessage::from_upload(upload, mime_type, is_voice_note);
        let receipt = self
            .client
            .send_message(&recipient, Message::audio(audio))
            .await?;

        debug!(message_id = %receipt.message_id, "Audio message sent");
        Ok(receipt)
    }
}
