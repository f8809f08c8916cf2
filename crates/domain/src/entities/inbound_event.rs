//! Normalized representation of an inbound chat message

use super::message::Message;
use super::session_event::MessageEvent;

/// Content forwarded for audio messages in place of the media itself
pub const AUDIO_MESSAGE_PLACEHOLDER: &str = "[Audio Message]";

/// What kind of content an inbound message carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Text,
    Audio,
    /// No supported content (images, locations, stickers, empty text, ...)
    Ignored,
}

/// An inbound message reduced to what the backend needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// User part of the chat (the logical contact)
    pub sender_user: String,
    /// Full address of the sending device, for replying to that exact device
    pub sender_address: String,
    pub content: String,
    pub kind: ContentKind,
}

impl InboundEvent {
    /// Translate a received message event.
    ///
    /// Content is taken from the first present field in the order
    /// conversation, extended text, audio. Empty content yields
    /// [`ContentKind::Ignored`]. The self-origination flag is not inspected.
    #[must_use]
    pub fn from_message(event: &MessageEvent) -> Self {
        let (content, kind) = extract_content(&event.message);
        let kind = if content.is_empty() {
            ContentKind::Ignored
        } else {
            kind
        };

        Self {
            sender_user: event.chat_user.clone(),
            sender_address: event.sender.clone(),
            content,
            kind,
        }
    }

    /// Whether the event carries content worth forwarding
    #[must_use]
    pub fn is_forwardable(&self) -> bool {
        self.kind != ContentKind::Ignored
    }
}

fn extract_content(message: &Message) -> (String, ContentKind) {
    if let Some(text) = &message.conversation {
        (text.clone(), ContentKind::Text)
    } else if let Some(extended) = &message.extended_text {
        (extended.text.clone().unwrap_or_default(), ContentKind::Text)
    } else if message.audio.is_some() {
        (AUDIO_MESSAGE_PLACEHOLDER.to_string(), ContentKind::Audio)
    } else {
        (String::new(), ContentKind::Ignored)
    }
}
