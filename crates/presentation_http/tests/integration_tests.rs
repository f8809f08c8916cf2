//! Integration tests for HTTP handlers
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use application::error::ApplicationError;
use application::ports::{ProtocolClientPort, SendReceipt};
use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use axum_test::multipart::{MultipartForm, Part};
use domain::{MediaKind, Message, RecipientAddress, UploadResult};
use infrastructure::{AppConfig, WhatsAppSessionAdapter};
use integration_whatsapp::SessionClientConfig;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};

/// Recorded call on the fake protocol client
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Upload { size: usize, kind: MediaKind },
    Send { to: String, message: Message },
}

/// Protocol client double with scripted failures
#[derive(Default)]
struct FakeSession {
    calls: Mutex<Vec<Call>>,
    fail_upload: Option<String>,
    fail_send: Option<String>,
    available: bool,
}

impl FakeSession {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProtocolClientPort for FakeSession {
    async fn send_message(
        &self,
        recipient: &RecipientAddress,
        message: Message,
    ) -> Result<SendReceipt, ApplicationError> {
        self.calls.lock().unwrap().push(Call::Send {
            to: recipient.to_string(),
            message,
        });
        match &self.fail_send {
            Some(reason) => Err(ApplicationError::Send(reason.clone())),
            None => Ok(SendReceipt {
                message_id: "3EB0FAKE".to_string(),
                timestamp: 1_700_000_000,
            }),
        }
    }

    async fn upload(
        &self,
        data: Vec<u8>,
        kind: MediaKind,
    ) -> Result<UploadResult, ApplicationError> {
        self.calls.lock().unwrap().push(Call::Upload {
            size: data.len(),
            kind,
        });
        match &self.fail_upload {
            Some(reason) => Err(ApplicationError::Upload(reason.clone())),
            None => Ok(UploadResult {
                url: "https://mmg.whatsapp.net/d/f/x.enc".to_string(),
                direct_path: "/v/t62/x.enc".to_string(),
                media_key: vec![1; 32],
                file_enc_sha256: vec![2; 32],
                file_sha256: vec![3; 32],
                file_length: data.len() as u64,
            }),
        }
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}

fn server_with(session: Arc<FakeSession>, config: AppConfig) -> TestServer {
    // Real JID grammar; the daemon socket is never touched by parsing
    let parser = Arc::new(WhatsAppSessionAdapter::new(
        SessionClientConfig::default().with_socket_path("/nonexistent/wa-session.sock"),
    ));
    let state = AppState::new(session, parser, Arc::new(config));
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn server(session: Arc<FakeSession>) -> TestServer {
    server_with(session, AppConfig::default())
}

fn audio_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("recipient", "+15551234567")
        .add_part(
            "file",
            Part::bytes(b"OggS-audio".to_vec())
                .file_name("note.ogg")
                .mime_type("audio/ogg; codecs=opus"),
        )
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_check_returns_ok() {
    let server = server(Arc::new(FakeSession::default()));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn readiness_reflects_session() {
    let ready = server(Arc::new(FakeSession {
        available: true,
        ..FakeSession::default()
    }));
    let response = ready.get("/ready").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["session"]["healthy"], true);

    let not_ready = server(Arc::new(FakeSession::default()));
    let response = not_ready.get("/ready").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["ready"], false);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let server = server(Arc::new(FakeSession::default()));
    let id = "0190d3f0-5b7e-7c3a-9f4e-2a1b3c4d5e6f";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

// ============================================================================
// POST /api/send
// ============================================================================

#[tokio::test]
async fn send_text_normalizes_recipient() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let response = server
        .post("/api/send")
        .json(&json!({"recipient": "whatsapp:+15551234567", "message": "Hello"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "sent"}));
    assert_eq!(
        session.calls(),
        vec![Call::Send {
            to: "15551234567@s.whatsapp.net".to_string(),
            message: Message::text("Hello"),
        }]
    );
}

#[tokio::test]
async fn send_text_keeps_explicit_server() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    server
        .post("/api/send")
        .json(&json!({"recipient": "120363025246125888@g.us", "message": "Hi group"}))
        .await
        .assert_status_ok();

    let calls = session.calls();
    let [Call::Send { to, .. }] = calls.as_slice() else {
        panic!("expected exactly one send");
    };
    assert_eq!(to, "120363025246125888@g.us");
}

#[tokio::test]
async fn send_text_device_qualified_recipient() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    server
        .post("/api/send")
        .json(&json!({"recipient": "15551234567:3@s.whatsapp.net", "message": "Hi"}))
        .await
        .assert_status_ok();

    let calls = session.calls();
    let [Call::Send { to, .. }] = calls.as_slice() else {
        panic!("expected exactly one send");
    };
    assert_eq!(to, "15551234567:3@s.whatsapp.net");
}

#[tokio::test]
async fn send_text_malformed_body() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let response = server
        .post("/api/send")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid request"}));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn send_text_invalid_recipients() {
    for recipient in ["", "   ", "@s.whatsapp.net", "1555:x@s.whatsapp.net", "1555:1"] {
        let session = Arc::new(FakeSession::default());
        let server = server(session.clone());

        let response = server
            .post("/api/send")
            .json(&json!({"recipient": recipient, "message": "Hello"}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"error": "Invalid JID format"}));
        assert!(session.calls().is_empty(), "no send for {recipient:?}");
    }
}

#[tokio::test]
async fn send_text_failure_surfaces_message() {
    let session = Arc::new(FakeSession {
        fail_send: Some("websocket not connected".to_string()),
        ..FakeSession::default()
    });
    let server = server(session.clone());

    let response = server
        .post("/api/send")
        .json(&json!({"recipient": "15551234567", "message": "Hello"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({"error": "websocket not connected"}));
    assert_eq!(session.calls().len(), 1);
}

// ============================================================================
// POST /api/send_audio
// ============================================================================

#[tokio::test]
async fn send_audio_uploads_then_sends() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let response = server
        .post("/api/send_audio")
        .multipart(audio_form().add_text("is_voice_note", "TRUE"))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "sent"}));

    let calls = session.calls();
    assert_eq!(
        calls[0],
        Call::Upload {
            size: 10,
            kind: MediaKind::Audio
        }
    );
    let Call::Send { to, message } = &calls[1] else {
        panic!("expected send after upload");
    };
    assert_eq!(to, "15551234567@s.whatsapp.net");
    let audio = message.audio.as_ref().expect("audio message");
    assert_eq!(audio.mime_type, "audio/ogg; codecs=opus");
    assert!(audio.ptt);
    assert_eq!(audio.direct_path, "/v/t62/x.enc");
    assert_eq!(audio.file_length, 10);
}

#[tokio::test]
async fn send_audio_phone_fallback_and_defaults() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let form = MultipartForm::new()
        .add_text("phone", "15559876543")
        .add_text("is_voice_note", "0")
        .add_part("file", Part::bytes(b"RIFF".to_vec()).file_name("clip"));

    server
        .post("/api/send_audio")
        .multipart(form)
        .await
        .assert_status_ok();

    let calls = session.calls();
    let Call::Send { to, message } = &calls[1] else {
        panic!("expected send after upload");
    };
    assert_eq!(to, "15559876543@s.whatsapp.net");
    let audio = message.audio.as_ref().expect("audio message");
    assert!(!audio.ptt);
    // axum-test sends no part content type unless one is set
    assert!(audio.mime_type == "audio/ogg" || audio.mime_type == "application/octet-stream");
}

#[tokio::test]
async fn send_audio_missing_recipient() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let form = MultipartForm::new()
        .add_part("file", Part::bytes(b"OggS".to_vec()).file_name("note.ogg"));

    let response = server.post("/api/send_audio").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Missing recipient"}));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn send_audio_missing_file() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let form = MultipartForm::new().add_text("recipient", "15551234567");

    let response = server.post("/api/send_audio").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Missing file"}));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn send_audio_missing_recipient_checked_before_file() {
    let server = server(Arc::new(FakeSession::default()));

    let response = server
        .post("/api/send_audio")
        .multipart(MultipartForm::new())
        .await;

    response.assert_json(&json!({"error": "Missing recipient"}));
}

#[tokio::test]
async fn send_audio_blank_recipient_is_missing() {
    for raw in ["   ", "whatsapp:+"] {
        for with_file in [true, false] {
            let session = Arc::new(FakeSession::default());
            let server = server(session.clone());

            let mut form = MultipartForm::new().add_text("recipient", raw);
            if with_file {
                form = form.add_part("file", Part::bytes(b"OggS".to_vec()).file_name("note.ogg"));
            }
            let response = server.post("/api/send_audio").multipart(form).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({"error": "Missing recipient"}));
            assert!(session.calls().is_empty(), "{raw:?} with_file={with_file}");
        }
    }
}

#[tokio::test]
async fn send_audio_file_checked_before_address() {
    let server = server(Arc::new(FakeSession::default()));

    let form = MultipartForm::new().add_text("recipient", "@s.whatsapp.net");
    let response = server.post("/api/send_audio").multipart(form).await;

    response.assert_json(&json!({"error": "Missing file"}));
}

#[tokio::test]
async fn send_audio_oversized_file_is_unreadable() {
    let session = Arc::new(FakeSession::default());
    let mut config = AppConfig::default();
    config.server.max_body_size_audio_bytes = 1024;
    let server = server_with(session.clone(), config);

    let form = MultipartForm::new()
        .add_text("recipient", "15551234567")
        .add_part("file", Part::bytes(vec![0_u8; 8192]).file_name("big.ogg"));

    let response = server.post("/api/send_audio").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Failed to read file"}));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn send_audio_invalid_address() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let form = MultipartForm::new()
        .add_text("recipient", "1555.1.2:3@s.whatsapp.net")
        .add_part("file", Part::bytes(b"OggS".to_vec()).file_name("note.ogg"));

    let response = server.post("/api/send_audio").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Invalid JID format"}));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn send_audio_upload_failure_skips_send() {
    let session = Arc::new(FakeSession {
        fail_upload: Some("failed to upload media: 413".to_string()),
        ..FakeSession::default()
    });
    let server = server(session.clone());

    let response = server.post("/api/send_audio").multipart(audio_form()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({"error": "failed to upload media: 413"}));
    assert_eq!(
        session.calls(),
        vec![Call::Upload {
            size: 10,
            kind: MediaKind::Audio
        }]
    );
}

#[tokio::test]
async fn send_audio_send_failure() {
    let session = Arc::new(FakeSession {
        fail_send: Some("server returned error 479".to_string()),
        ..FakeSession::default()
    });
    let server = server(session.clone());

    let response = server.post("/api/send_audio").multipart(audio_form()).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({"error": "server returned error 479"}));
    assert_eq!(session.calls().len(), 2);
}

#[tokio::test]
async fn send_audio_requires_multipart() {
    let session = Arc::new(FakeSession::default());
    let server = server(session.clone());

    let response = server
        .post("/api/send_audio")
        .json(&json!({"recipient": "15551234567"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"error": "Missing recipient"}));
}
