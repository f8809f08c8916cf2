//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings and log format
//! - `session`: session daemon socket and event subscription
//! - `webhook`: backend webhook delivery

mod server;
mod session;
mod webhook;

use serde::{Deserialize, Serialize};

pub use server::{LogFormat, ServerConfig};
pub use session::SessionConfig;
pub use webhook::WebhookConfig;

/// Environment variable prefix (e.g. `WABRIDGE_SERVER__PORT`)
pub const ENV_PREFIX: &str = "WABRIDGE";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session daemon configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Backend webhook configuration
    #[serde(default)]
    pub webhook: WebhookConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and environment
    ///
    /// Environment variables use the `WABRIDGE_` prefix and a double
    /// underscore between section and key, so keys may contain `_`
    /// (e.g. `WABRIDGE_SESSION__SOCKET_PATH`).
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or a value has the
    /// wrong type.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (extension optional) and
    /// environment
    ///
    /// # Errors
    /// Returns an error if a source cannot be parsed or a value has the
    /// wrong type.
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }
}
