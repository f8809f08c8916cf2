//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the session daemon client and
//! an HTTP webhook client, and owns configuration loading and tracing setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, LogFormat, ServerConfig, SessionConfig, WebhookConfig};
pub use telemetry::init_tracing;
