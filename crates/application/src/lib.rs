//! Application layer - Use cases and orchestration
//!
//! Resolves recipients, dispatches outbound messages through the protocol
//! client and forwards inbound messages to the backend webhook. All external
//! systems are reached through the ports defined here.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
