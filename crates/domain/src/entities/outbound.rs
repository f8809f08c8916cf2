//! Outbound send requests

use crate::value_objects::RecipientAddress;

/// Mime type used when the uploader did not declare one
pub const DEFAULT_AUDIO_MIME: &str = "audio/ogg";

/// Interpret a voice-note form flag: `"true"` (any case) or `"1"`
#[must_use]
pub fn is_voice_note_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

/// A text message to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundText {
    pub recipient: RecipientAddress,
    pub body: String,
}

impl OutboundText {
    #[must_use]
    pub fn new(recipient: RecipientAddress, body: impl Into<String>) -> Self {
        Self {
            recipient,
            body: body.into(),
        }
    }
}

/// An audio file to upload and send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundAudio {
    pub recipient: RecipientAddress,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub is_voice_note: bool,
}

impl OutboundAudio {
    /// Create an audio request; an absent or empty mime type falls back to
    /// [`DEFAULT_AUDIO_MIME`].
    #[must_use]
    pub fn new(
        recipient: RecipientAddress,
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
        is_voice_note: bool,
    ) -> Self {
        let mime_type = declared_mime
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();

        Self {
            recipient,
            bytes,
            mime_type,
            is_voice_note,
        }
    }
}
