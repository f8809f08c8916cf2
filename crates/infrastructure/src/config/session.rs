//! Session daemon connection settings.

use std::time::Duration;

use integration_whatsapp::SessionClientConfig;
use serde::{Deserialize, Serialize};

/// Session daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unix socket of the session daemon
    #[serde(default = "default_socket_path")]
    pub socket_path: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay before resubscribing after the event stream ends
    #[serde(default = "default_resubscribe_delay")]
    pub resubscribe_delay_secs: u64,
}

impl SessionConfig {
    /// Client configuration for the session daemon
    #[must_use]
    pub fn client_config(&self) -> SessionClientConfig {
        SessionClientConfig::default()
            .with_socket_path(self.socket_path.clone())
            .with_timeout_ms(self.timeout_ms)
    }

    /// Resubscribe delay as a [`Duration`]
    #[must_use]
    pub const fn resubscribe_delay(&self) -> Duration {
        Duration::from_secs(self.resubscribe_delay_secs)
    }
}

fn default_socket_path() -> String {
    SessionClientConfig::DEFAULT_SOCKET_PATH.to_string()
}

const fn default_timeout_ms() -> u64 {
    SessionClientConfig::DEFAULT_TIMEOUT_MS
}

const fn default_resubscribe_delay() -> u64 {
    5
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            timeout_ms: default_timeout_ms(),
            resubscribe_delay_secs: default_resubscribe_delay(),
        }
    }
}
