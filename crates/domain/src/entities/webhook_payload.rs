//! Payload pushed to the backend webhook for every forwarded message

use serde::{Deserialize, Serialize};

use super::inbound_event::{ContentKind, InboundEvent};

/// Prefix of the `from` field; the backend addresses contacts this way
pub const WEBHOOK_FROM_PREFIX: &str = "whatsapp:+";

/// Message type reported to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookMessageType {
    Text,
    Audio,
}

/// JSON body of the webhook call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// `whatsapp:+<chat user>`
    pub from: String,
    /// Full address of the sending device
    #[serde(rename = "sender_jid")]
    pub sender_address: String,
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: WebhookMessageType,
}

impl WebhookPayload {
    /// Build the payload for an inbound event.
    ///
    /// Returns `None` for events without forwardable content.
    #[must_use]
    pub fn from_event(event: InboundEvent) -> Option<Self> {
        let message_type = match event.kind {
            ContentKind::Text => WebhookMessageType::Text,
            ContentKind::Audio => WebhookMessageType::Audio,
            ContentKind::Ignored => return None,
        };

        Some(Self {
            from: format!("{WEBHOOK_FROM_PREFIX}{}", event.sender_user),
            sender_address: event.sender_address,
            content: event.content,
            message_type,
        })
    }
}
