//! Events delivered by the protocol session

use super::message::Message;

/// An event emitted by the protocol session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A chat message was received (or sent from another of our devices)
    Message(MessageEvent),
    /// Delivery or read receipt for messages we sent
    Receipt(ReceiptEvent),
    /// Session connected to the protocol servers
    Connected,
    /// Session lost its connection
    Disconnected,
    /// Device was unlinked; the session needs to be paired again
    LoggedOut,
    /// Any event kind the bridge does not act on, by name
    Other(String),
}

impl SessionEvent {
    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Message(_) => "message",
            Self::Receipt(_) => "receipt",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::LoggedOut => "logged_out",
            Self::Other(name) => name,
        }
    }
}

/// A received chat message together with its routing info
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageEvent {
    /// Protocol message id
    pub id: String,
    /// Set when the message originated from this account
    pub is_from_me: bool,
    /// User part of the chat the message belongs to (the logical contact)
    pub chat_user: String,
    /// Full address of the sending device
    pub sender: String,
    /// Message envelope
    pub message: Message,
}

/// Receipt for previously sent messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptEvent {
    pub message_ids: Vec<String>,
    pub sender: String,
    /// Receipt type as reported by the protocol ("delivered", "read", ...)
    pub receipt_type: String,
}
