//! Session daemon configuration and JSON-RPC protocol structures

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use domain::{
    AudioMessage, ExtendedTextMessage, Message, MessageEvent, ReceiptEvent, SessionEvent,
    UploadResult,
};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::jid::parse_jid;

/// Configuration for the session client
#[derive(Debug, Clone)]
pub struct SessionClientConfig {
    /// Path to the session daemon's JSON-RPC socket
    pub socket_path: String,
    /// Timeout for a single request/response exchange in milliseconds
    pub timeout_ms: u64,
}

impl SessionClientConfig {
    /// Default socket path of the session daemon
    pub const DEFAULT_SOCKET_PATH: &'static str = "/var/run/wa-session/socket";

    /// Default request timeout (30 seconds)
    pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

    /// Set the socket path
    #[must_use]
    pub fn with_socket_path(mut self, path: impl Into<String>) -> Self {
        self.socket_path = path.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl Default for SessionClientConfig {
    fn default() -> Self {
        Self {
            socket_path: Self::DEFAULT_SOCKET_PATH.to_string(),
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// JSON-RPC Protocol Types
// ============================================================================

/// JSON-RPC request structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: &'static str,
    /// Request method
    pub method: String,
    /// Request parameters
    pub params: P,
    /// Request ID
    pub id: u64,
}

impl<P> JsonRpcRequest<P> {
    /// Create a new JSON-RPC request
    #[must_use]
    pub fn new(method: impl Into<String>, params: P, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response structure
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<R> {
    /// Result (if successful)
    pub result: Option<R>,
    /// Error (if failed)
    pub error: Option<JsonRpcError>,
    /// Response ID
    pub id: Option<u64>,
}

/// JSON-RPC error structure
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
}

/// JSON-RPC notification (server-initiated, no id)
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcNotification {
    /// Notification method, `"event"` for session events
    pub method: String,
    /// Notification parameters
    #[serde(default)]
    pub params: serde_json::Value,
}

// ============================================================================
// Method Parameters and Results
// ============================================================================

/// Parameters for the `send` method
#[derive(Debug, Clone, Serialize)]
pub struct SendParams {
    /// Recipient JID
    pub recipient: String,
    /// Message envelope
    pub message: WireMessage,
}

/// Result of the `send` method
#[derive(Debug, Clone, Deserialize)]
pub struct SendResult {
    /// Protocol message id
    pub id: String,
    /// Server timestamp (Unix seconds)
    #[serde(default)]
    pub timestamp: i64,
}

/// Parameters for the `upload` method
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadParams {
    /// Media class (`"audio"`, `"image"`, ...)
    pub media_type: &'static str,
    /// Base64-encoded file contents
    pub data: String,
}

impl UploadParams {
    /// Encode raw media bytes for upload
    #[must_use]
    pub fn new(media_type: &'static str, data: &[u8]) -> Self {
        Self {
            media_type,
            data: BASE64.encode(data),
        }
    }
}

/// Result of the `upload` method
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUploadResult {
    /// Media URL
    pub url: String,
    /// Direct path on the media servers
    pub direct_path: String,
    /// Base64 media key
    pub media_key: String,
    /// Base64 SHA-256 of the encrypted file
    pub file_enc_sha256: String,
    /// Base64 SHA-256 of the plain file
    pub file_sha256: String,
    /// Plain file length in bytes
    pub file_length: u64,
}

impl TryFrom<WireUploadResult> for UploadResult {
    type Error = SessionError;

    fn try_from(wire: WireUploadResult) -> Result<Self, Self::Error> {
        Ok(Self {
            url: wire.url,
            direct_path: wire.direct_path,
            media_key: decode_field("mediaKey", &wire.media_key)?,
            file_enc_sha256: decode_field("fileEncSha256", &wire.file_enc_sha256)?,
            file_sha256: decode_field("fileSha256", &wire.file_sha256)?,
            file_length: wire.file_length,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, SessionError> {
    BASE64
        .decode(value)
        .map_err(|e| SessionError::protocol(format!("invalid base64 in {name}: {e}")))
}

// ============================================================================
// Message Envelope
// ============================================================================

/// Message envelope as exchanged with the daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    /// Plain conversation text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,
    /// Extended text sub-message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_text_message: Option<WireExtendedText>,
    /// Audio sub-message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_message: Option<WireAudioMessage>,
}

/// Extended text sub-message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireExtendedText {
    /// Text body
    #[serde(default)]
    pub text: Option<String>,
}

/// Audio sub-message; binary fields are base64
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireAudioMessage {
    /// Mime type
    pub mimetype: String,
    /// Media URL
    pub url: String,
    /// Direct path
    pub direct_path: String,
    /// Media key
    pub media_key: String,
    /// SHA-256 of the encrypted file
    pub file_enc_sha256: String,
    /// SHA-256 of the plain file
    pub file_sha256: String,
    /// Plain file length
    pub file_length: u64,
    /// Voice note flag
    pub ptt: bool,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            conversation: message.conversation.clone(),
            extended_text_message: message.extended_text.as_ref().map(|ext| WireExtendedText {
                text: ext.text.clone(),
            }),
            audio_message: message.audio.as_ref().map(WireAudioMessage::from),
        }
    }
}

impl From<&AudioMessage> for WireAudioMessage {
    fn from(audio: &AudioMessage) -> Self {
        Self {
            mimetype: audio.mime_type.clone(),
            url: audio.url.clone(),
            direct_path: audio.direct_path.clone(),
            media_key: BASE64.encode(&audio.media_key),
            file_enc_sha256: BASE64.encode(&audio.file_enc_sha256),
            file_sha256: BASE64.encode(&audio.file_sha256),
            file_length: audio.file_length,
            ptt: audio.ptt,
        }
    }
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self {
            conversation: wire.conversation,
            extended_text: wire
                .extended_text_message
                .map(|ext| ExtendedTextMessage { text: ext.text }),
            audio: wire.audio_message.map(AudioMessage::from),
        }
    }
}

// Inbound media references are informational only; undecodable keys are
// left empty instead of dropping the message.
impl From<WireAudioMessage> for AudioMessage {
    fn from(wire: WireAudioMessage) -> Self {
        Self {
            mime_type: wire.mimetype,
            url: wire.url,
            direct_path: wire.direct_path,
            media_key: BASE64.decode(wire.media_key).unwrap_or_default(),
            file_enc_sha256: BASE64.decode(wire.file_enc_sha256).unwrap_or_default(),
            file_sha256: BASE64.decode(wire.file_sha256).unwrap_or_default(),
            file_length: wire.file_length,
            ptt: wire.ptt,
        }
    }
}

// ============================================================================
// Session Events
// ============================================================================

/// Routing info of a received message
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessageInfo {
    /// Message id
    pub id: String,
    /// Chat JID
    pub chat: String,
    /// Sender device JID
    pub sender: String,
    /// Sent by this account
    #[serde(default)]
    pub is_from_me: bool,
}

/// `message` event
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessageEvent {
    /// Routing info
    pub info: WireMessageInfo,
    /// Envelope
    #[serde(default)]
    pub message: WireMessage,
}

/// `receipt` event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireReceiptEvent {
    /// Acknowledged message ids
    #[serde(default)]
    pub message_ids: Vec<String>,
    /// Sender JID
    #[serde(default)]
    pub sender: String,
    /// Receipt type
    #[serde(default)]
    pub receipt_type: String,
}

/// Decode the params of an `event` notification.
///
/// Unknown event types decode into [`SessionEvent::Other`].
pub fn decode_event(params: serde_json::Value) -> Result<SessionEvent, SessionError> {
    let kind = params
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| SessionError::protocol("event without type"))?
        .to_owned();

    match kind.as_str() {
        "message" => {
            let wire: WireMessageEvent = serde_json::from_value(params)?;
            let chat = parse_jid(&wire.info.chat)?;
            Ok(SessionEvent::Message(MessageEvent {
                id: wire.info.id,
                is_from_me: wire.info.is_from_me,
                chat_user: chat.user().to_string(),
                sender: wire.info.sender,
                message: wire.message.into(),
            }))
        },
        "receipt" => {
            let wire: WireReceiptEvent = serde_json::from_value(params)?;
            Ok(SessionEvent::Receipt(ReceiptEvent {
                message_ids: wire.message_ids,
                sender: wire.sender,
                receipt_type: wire.receipt_type,
            }))
        },
        "connected" => Ok(SessionEvent::Connected),
        "disconnected" => Ok(SessionEvent::Disconnected),
        "loggedOut" => Ok(SessionEvent::LoggedOut),
        other => Ok(SessionEvent::Other(other.to_string())),
    }
}
