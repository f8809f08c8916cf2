//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod address_parser_port;
mod event_source_port;
mod protocol_client_port;
mod webhook_port;

pub use address_parser_port::AddressParserPort;
#[cfg(test)]
pub use address_parser_port::MockAddressParserPort;
pub use event_source_port::EventSourcePort;
#[cfg(test)]
pub use event_source_port::MockEventSourcePort;
#[cfg(test)]
pub use protocol_client_port::MockProtocolClientPort;
pub use protocol_client_port::{ProtocolClientPort, SendReceipt};
#[cfg(test)]
pub use webhook_port::MockWebhookPort;
pub use webhook_port::{WebhookDelivery, WebhookPort};
