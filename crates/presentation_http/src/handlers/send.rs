//! Outbound send handlers
//!
//! `POST /api/send` takes JSON; `POST /api/send_audio` takes multipart form
//! data. Both resolve the recipient, then hand off to the dispatcher.

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartRejection},
        rejection::JsonRejection,
    },
};
use domain::{OutboundAudio, OutboundText, is_voice_note_flag, normalize_recipient};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{error::ApiError, state::AppState};

/// Body of `POST /api/send`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub message: String,
}

/// Success body of both send endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendResponse {
    pub status: String,
}

impl SendResponse {
    fn sent() -> Self {
        Self {
            status: "sent".to_string(),
        }
    }
}

/// Send a text message
pub async fn send_text(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected send request body");
        ApiError::InvalidRequest
    })?;

    let address = state.resolver.resolve(&request.recipient)?;
    info!(recipient = %request.recipient, address = %address, "Sending text message");

    let receipt = state
        .dispatcher
        .send_text(OutboundText::new(address, request.message))
        .await?;

    debug!(message_id = %receipt.message_id, "Text message sent");
    Ok(Json(SendResponse::sent()))
}

/// Multipart fields of `POST /api/send_audio`; first occurrence wins
#[derive(Debug, Default)]
struct AudioForm {
    recipient: Option<String>,
    phone: Option<String>,
    is_voice_note: Option<String>,
    file: Option<FilePart>,
}

#[derive(Debug)]
enum FilePart {
    Read {
        bytes: Vec<u8>,
        content_type: Option<String>,
    },
    Unreadable,
}

impl AudioForm {
    async fn read(mut multipart: Multipart) -> Self {
        let mut form = Self::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Malformed multipart body");
                    break;
                },
            };

            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("recipient") if form.recipient.is_none() => {
                    form.recipient = Some(text_value(field).await);
                },
                Some("phone") if form.phone.is_none() => {
                    form.phone = Some(text_value(field).await);
                },
                Some("is_voice_note") if form.is_voice_note.is_none() => {
                    form.is_voice_note = Some(text_value(field).await);
                },
                Some("file") if form.file.is_none() && field.file_name().is_some() => {
                    let content_type = field.content_type().map(str::to_string);
                    form.file = Some(match field.bytes().await {
                        Ok(bytes) => FilePart::Read {
                            bytes: bytes.to_vec(),
                            content_type,
                        },
                        Err(e) => {
                            warn!(error = %e, "Failed to read uploaded file");
                            FilePart::Unreadable
                        },
                    });
                },
                _ => {},
            }
        }

        form
    }

    /// `recipient`, falling back to `phone` when it is empty.
    ///
    /// A value with nothing left after normalization counts as absent.
    fn recipient(&self) -> Option<&str> {
        [self.recipient.as_deref(), self.phone.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .filter(|value| !normalize_recipient(value).is_empty())
    }
}

async fn text_value(field: Field<'_>) -> String {
    field.text().await.unwrap_or_default()
}

/// Upload an audio file and send it as an audio message
pub async fn send_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SendResponse>, ApiError> {
    let form = match multipart {
        Ok(multipart) => AudioForm::read(multipart).await,
        Err(rejection) => {
            debug!(error = %rejection, "Request is not multipart form data");
            AudioForm::default()
        },
    };

    let recipient = form.recipient().ok_or(ApiError::MissingRecipient)?.to_string();
    let (bytes, content_type) = match form.file {
        None => return Err(ApiError::MissingFile),
        Some(FilePart::Unreadable) => return Err(ApiError::UnreadableFile),
        Some(FilePart::Read {
            bytes,
            content_type,
        }) => (bytes, content_type),
    };

    let address = state.resolver.resolve(&recipient)?;
    let is_voice_note = is_voice_note_flag(form.is_voice_note.as_deref());
    info!(
        recipient = %recipient,
        address = %address,
        size = bytes.len(),
        is_voice_note,
        "Sending audio message"
    );

    let audio = OutboundAudio::new(address, bytes, content_type.as_deref(), is_voice_note);
    let receipt = state.dispatcher.send_audio(audio).await?;

    debug!(message_id = %receipt.message_id, "Audio message sent");
    Ok(Json(SendResponse::sent()))
}
