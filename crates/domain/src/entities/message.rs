//! Protocol message envelope
//!
//! Mirrors the sub-fields of a protocol message that the bridge reads or
//! writes. Inbound messages may carry any combination of them; outbound
//! messages set exactly one.

/// A protocol message envelope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    /// Plain conversation text
    pub conversation: Option<String>,
    /// Extended text (replies, link previews, quoted text)
    pub extended_text: Option<ExtendedTextMessage>,
    /// Audio attachment
    pub audio: Option<AudioMessage>,
}

impl Message {
    /// Text-only message
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            conversation: Some(body.into()),
            ..Self::default()
        }
    }

    /// Audio-only message
    #[must_use]
    pub fn audio(audio: AudioMessage) -> Self {
        Self {
            audio: Some(audio),
            ..Self::default()
        }
    }
}

/// Extended text sub-message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedTextMessage {
    /// Text body, absent on some client versions
    pub text: Option<String>,
}

/// Audio sub-message referencing previously uploaded media
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioMessage {
    pub mime_type: String,
    pub url: String,
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
    /// Play as a voice note (push-to-talk) instead of an audio file
    pub ptt: bool,
}

impl AudioMessage {
    /// Build an audio message from an upload result.
    ///
    /// The upload result is consumed; it cannot be reused for another message.
    #[must_use]
    pub fn from_upload(upload: UploadResult, mime_type: impl Into<String>, ptt: bool) -> Self {
        Self {
            mime_type: mime_type.into(),
            url: upload.url,
            direct_path: upload.direct_path,
            media_key: upload.media_key,
            file_enc_sha256: upload.file_enc_sha256,
            file_sha256: upload.file_sha256,
            file_length: upload.file_length,
            ptt,
        }
    }
}

/// Media class used when staging an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
}

impl MediaKind {
    /// Protocol name of the media class
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
        }
    }
}

/// Reference metadata for media staged with the protocol backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadResult {
    pub url: String,
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_upload() -> UploadResult {
        UploadResult {
            url: "https://mmg.whatsapp.net/v/t62/abc".to_string(),
            direct_path: "/v/t62/abc".to_string(),
            media_key: vec![1, 2, 3],
            file_enc_sha256: vec![4, 5],
            file_sha256: vec![6],
            file_length: 2048,
        }
    }

    #[test]
    fn text_message_sets_only_conversation() {
        let message = Message::text("hello");
        assert_eq!(message.conversation.as_deref(), Some("hello"));
        assert!(message.extended_text.is_none());
        assert!(message.audio.is_none());
    }

    #[test]
    fn audio_from_upload_copies_references() {
        let audio = AudioMessage::from_upload(sample_upload(), "audio/ogg", true);
        assert_eq!(audio.url, "https://mmg.whatsapp.net/v/t62/abc");
        assert_eq!(audio.direct_path, "/v/t62/abc");
        assert_eq!(audio.media_key, vec![1, 2, 3]);
        assert_eq!(audio.file_enc_sha256, vec![4, 5]);
        assert_eq!(audio.file_sha256, vec![6]);
        assert_eq!(audio.file_length, 2048);
        assert_eq!(audio.mime_type, "audio/ogg");
        assert!(audio.ptt);
    }

    #[test]
    fn audio_message_sets_only_audio() {
        let message = Message::audio(AudioMessage::default());
        assert!(message.conversation.is_none());
        assert!(message.audio.is_some());
    }

    #[test]
    fn media_kind_name() {
        assert_eq!(MediaKind::Audio.as_str(), "audio");
    }
}
