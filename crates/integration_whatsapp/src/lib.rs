//! WhatsApp integration via a session daemon
//!
//! The chat-protocol session itself (pairing, encryption, session storage)
//! is owned by a daemon process. This crate talks to it with newline
//! delimited JSON-RPC over a Unix domain socket, and owns the protocol's
//! address (JID) grammar.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     Unix Socket      ┌─────────────────┐
//! │  SessionClient  │ ◄──────────────────► │  session daemon │ ◄──► WhatsApp
//! │  (This crate)   │      JSON-RPC        │                 │
//! └─────────────────┘                      └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use domain::{Message, RecipientAddress};
//! use integration_whatsapp::{SessionClient, SessionClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionClientConfig::default().with_socket_path("/run/wa-session.sock");
//! let client = SessionClient::new(config);
//!
//! if client.is_available().await {
//!     let to = RecipientAddress::phone("15551234567")?;
//!     let result = client.send_message(&to, &Message::text("Hello!")).await?;
//!     println!("sent {}", result.id);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod error;
pub mod jid;
mod types;

pub use client::SessionClient;
pub use error::SessionError;
pub use jid::parse_jid;
pub use types::{
    JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, SendParams, SendResult,
    SessionClientConfig, UploadParams, WireAudioMessage, WireExtendedText, WireMessage,
    WireMessageEvent, WireMessageInfo, WireReceiptEvent, WireUploadResult, decode_event,
};
