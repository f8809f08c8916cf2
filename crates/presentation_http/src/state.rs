//! Application state shared across handlers

use std::sync::Arc;

use application::ports::{AddressParserPort, ProtocolClientPort};
use application::{MessageDispatcher, RecipientResolver};
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Turns raw recipients into protocol addresses
    pub resolver: Arc<RecipientResolver>,
    /// Sends text and audio through the protocol client
    pub dispatcher: Arc<MessageDispatcher>,
    /// Protocol client handle, probed by the readiness check
    pub session: Arc<dyn ProtocolClientPort>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the state around one shared protocol client
    #[must_use]
    pub fn new(
        session: Arc<dyn ProtocolClientPort>,
        parser: Arc<dyn AddressParserPort>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            resolver: Arc::new(RecipientResolver::new(parser)),
            dispatcher: Arc::new(MessageDispatcher::new(Arc::clone(&session))),
            session,
            config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
