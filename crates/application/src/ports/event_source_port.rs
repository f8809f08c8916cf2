//! Event source port - subscription to protocol session events

use async_trait::async_trait;
use domain::SessionEvent;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;

use crate::error::ApplicationError;

/// Port delivering protocol session events
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventSourcePort: Send + Sync {
    /// Subscribe to session events.
    ///
    /// Events arrive in order on the returned channel. The channel closes
    /// when the subscription ends.
    async fn subscribe(&self) -> Result<mpsc::Receiver<SessionEvent>, ApplicationError>;
}
