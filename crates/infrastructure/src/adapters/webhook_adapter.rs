//! Backend webhook adapter
//!
//! Posts forwarded messages as JSON to the configured backend URL. Any HTTP
//! response counts as delivered; its status is reported for logging.

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{WebhookDelivery, WebhookPort};
use async_trait::async_trait;
use domain::WebhookPayload;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::WebhookConfig;

/// Connect timeout for webhook deliveries
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP implementation of [`WebhookPort`]
#[derive(Clone)]
pub struct HttpWebhookAdapter {
    client: Client,
    url: String,
}

impl HttpWebhookAdapter {
    /// Create a new adapter
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &WebhookConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout()))
            .user_agent(format!("WaBridge/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ApplicationError::Configuration(format!("Failed to build webhook client: {e}"))
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Target URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for HttpWebhookAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpWebhookAdapter")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WebhookPort for HttpWebhookAdapter {
    #[instrument(skip(self, payload), fields(url = %self.url, from = %payload.from))]
    async fn deliver(&self, payload: &WebhookPayload) -> Result<WebhookDelivery, ApplicationError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ApplicationError::ExternalService(format!("Webhook request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, "Webhook responded");

        Ok(WebhookDelivery {
            status: status.as_u16(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_configured_url() {
        let config = WebhookConfig {
            url: "http://backend:8000/hook".to_string(),
            ..WebhookConfig::default()
        };
        let adapter = HttpWebhookAdapter::new(&config).unwrap();
        assert_eq!(adapter.url(), "http://backend:8000/hook");
    }

    #[test]
    fn debug_shows_url() {
        let adapter = HttpWebhookAdapter::new(&WebhookConfig::default()).unwrap();
        assert!(format!("{adapter:?}").contains("whatsapp-webhook"));
    }
}
