//! Inbound event forwarding
//!
//! Session events arrive one at a time. Messages from other users that carry
//! text or audio are turned into a [`WebhookPayload`] and pushed to the
//! backend on a detached task, so a slow or unavailable backend never stalls
//! the event stream. Delivery is attempted once; its outcome is only logged.

use std::fmt;
use std::sync::Arc;

use domain::{InboundEvent, MessageEvent, SessionEvent, WebhookPayload};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::ports::WebhookPort;

/// Why an event was not forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Message was sent by this account
    SelfOriginated,
    /// Message had no text or audio content
    EmptyContent,
    /// Event is not a message
    NotAMessage,
}

/// Result of handling one session event
#[derive(Debug)]
pub enum ForwardOutcome {
    /// Delivery was spawned; the handle may be dropped to detach it
    Dispatched(JoinHandle<()>),
    /// Event was dropped
    Dropped(DropReason),
}

impl ForwardOutcome {
    /// Whether a webhook delivery was started
    #[must_use]
    pub const fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }
}

/// Filters session events and forwards messages to the backend webhook
pub struct EventForwarder {
    webhook: Arc<dyn WebhookPort>,
}

impl fmt::Debug for EventForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventForwarder").finish_non_exhaustive()
    }
}

impl EventForwarder {
    pub fn new(webhook: Arc<dyn WebhookPort>) -> Self {
        Self { webhook }
    }

    /// Handle one session event.
    ///
    /// Returns immediately; a forwarded message is delivered on a spawned
    /// task. Must be called from within a Tokio runtime.
    pub fn handle_event(&self, event: SessionEvent) -> ForwardOutcome {
        match event {
            SessionEvent::Message(message) => self.handle_message(&message),
            SessionEvent::Connected => {
                info!("Protocol session connected");
                ForwardOutcome::Dropped(DropReason::NotAMessage)
            },
            SessionEvent::Disconnected => {
                warn!("Protocol session disconnected");
                ForwardOutcome::Dropped(DropReason::NotAMessage)
            },
            SessionEvent::LoggedOut => {
                error!("Protocol session logged out; device must be paired again");
                ForwardOutcome::Dropped(DropReason::NotAMessage)
            },
            SessionEvent::Receipt(receipt) => {
                debug!(
                    receipt_type = %receipt.receipt_type,
                    count = receipt.message_ids.len(),
                    "Ignoring receipt"
                );
                ForwardOutcome::Dropped(DropReason::NotAMessage)
            },
            SessionEvent::Other(kind) => {
                debug!(kind = %kind, "Ignoring unhandled session event");
                ForwardOutcome::Dropped(DropReason::NotAMessage)
            },
        }
    }

    fn handle_message(&self, message: &MessageEvent) -> ForwardOutcome {
        if message.is_from_me {
            return ForwardOutcome::Dropped(DropReason::SelfOriginated);
        }

        let inbound = InboundEvent::from_message(message);
        let Some(payload) = WebhookPayload::from_event(inbound) else {
            debug!(message_id = %message.id, "Dropping message without text or audio content");
            return ForwardOutcome::Dropped(DropReason::EmptyContent);
        };

        info!(
            from = %message.chat_user,
            message_id = %message.id,
            content_len = payload.content.len(),
            "Received message"
        );

        ForwardOutcome::Dispatched(self.spawn_delivery(payload))
    }

    fn spawn_delivery(&self, payload: WebhookPayload) -> JoinHandle<()> {
        let webhook = Arc::clone(&self.webhook);
        tokio::spawn(async move {
            match webhook.deliver(&payload).await {
                Ok(delivery) => {
                    info!(status = delivery.status, from = %payload.from, "Sent to backend");
                },
                Err(e) => {
                    error!(error = %e, from = %payload.from, "Webhook delivery failed");
                },
            }
        })
    }
}
