//! Domain entities - message envelopes and the events that carry them

mod inbound_event;
mod message;
mod outbound;
mod session_event;
mod webhook_payload;

pub use inbound_event::{AUDIO_MESSAGE_PLACEHOLDER, ContentKind, InboundEvent};
pub use message::{AudioMessage, ExtendedTextMessage, MediaKind, Message, UploadResult};
pub use outbound::{DEFAULT_AUDIO_MIME, OutboundAudio, OutboundText, is_voice_note_flag};
pub use session_event::{MessageEvent, ReceiptEvent, SessionEvent};
pub use webhook_payload::{WEBHOOK_FROM_PREFIX, WebhookMessageType, WebhookPayload};
