//! Backend webhook settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Backend webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Whether inbound messages are forwarded at all
    #[serde(default = "super::default_true")]
    pub enabled: bool,

    /// Endpoint receiving forwarded messages
    #[serde(default = "default_url")]
    pub url: String,

    /// HTTP timeout for one delivery in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl WebhookConfig {
    /// Delivery timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_url() -> String {
    "http://localhost:8000/whatsapp-webhook".to_string()
}

const fn default_timeout() -> u64 {
    10
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}
