//! Application services

mod event_forwarder;
mod message_dispatcher;
mod recipient_resolver;

pub use event_forwarder::{DropReason, EventForwarder, ForwardOutcome};
pub use message_dispatcher::MessageDispatcher;
pub use recipient_resolver::RecipientResolver;
