//! Inbound event forwarding background task
//!
//! Subscribes to session events and hands each one to the forwarder. When
//! the stream ends or the subscription fails, waits and subscribes again.

use std::sync::Arc;
use std::time::Duration;

use application::EventForwarder;
use application::ports::EventSourcePort;
use tracing::{debug, info, warn};

/// Spawn the forwarding loop.
///
/// Returns a `JoinHandle` that can be used to abort the task on shutdown.
pub fn spawn_event_forwarding_task(
    source: Arc<dyn EventSourcePort>,
    forwarder: Arc<EventForwarder>,
    resubscribe_delay: Duration,
) -> tokio::task::JoinHandle<()> {
    info!(
        resubscribe_delay_secs = resubscribe_delay.as_secs(),
        "Starting event forwarding task"
    );

    tokio::spawn(async move {
        loop {
            forward_until_closed(source.as_ref(), &forwarder).await;
            tokio::time::sleep(resubscribe_delay).await;
        }
    })
}

/// One subscription: forward events until the stream closes
async fn forward_until_closed(source: &dyn EventSourcePort, forwarder: &EventForwarder) {
    let mut events = match source.subscribe().await {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "Event subscription failed");
            return;
        },
    };

    info!("Subscribed to session events");

    while let Some(event) = events.recv().await {
        let kind = event.kind().to_string();
        let outcome = forwarder.handle_event(event);
        debug!(kind = %kind, dispatched = outcome.is_dispatched(), "Event handled");
    }

    warn!("Session event stream ended");
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use application::error::ApplicationError;
    use application::ports::{WebhookDelivery, WebhookPort};
    use async_trait::async_trait;
    use domain::{Message, MessageEvent, SessionEvent, WebhookPayload};
    use tokio::sync::{Notify, mpsc};

    use super::*;

    /// Hands out pre-filled event streams, then fails
    struct ScriptedSource {
        streams: Mutex<VecDeque<Vec<SessionEvent>>>,
        subscriptions: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(streams: Vec<Vec<SessionEvent>>) -> Self {
            Self {
                streams: Mutex::new(streams.into()),
                subscriptions: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl EventSourcePort for ScriptedSource {
        async fn subscribe(&self) -> Result<mpsc::Receiver<SessionEvent>, ApplicationError> {
            self.subscriptions.fetch_add(1, Ordering::SeqCst);
            let next = self.streams.lock().unwrap().pop_front();
            let Some(events) = next else {
                return Err(ApplicationError::ExternalService("daemon down".to_string()));
            };
            let (tx, rx) = mpsc::channel(events.len().max(1));
            for event in events {
                tx.try_send(event).unwrap();
            }
            Ok(rx)
        }
    }

    /// Records delivered payloads and wakes the test after `expected`
    struct RecordingWebhook {
        delivered: Mutex<Vec<WebhookPayload>>,
        expected: usize,
        done: Notify,
    }

    #[async_trait]
    impl WebhookPort for RecordingWebhook {
        async fn deliver(
            &self,
            payload: &WebhookPayload,
        ) -> Result<WebhookDelivery, ApplicationError> {
            let count = {
                let mut delivered = self.delivered.lock().unwrap();
                delivered.push(payload.clone());
                delivered.len()
            };
            if count >= self.expected {
                self.done.notify_one();
            }
            Ok(WebhookDelivery { status: 200 })
        }
    }

    fn text_event(text: &str) -> SessionEvent {
        SessionEvent::Message(MessageEvent {
            id: text.to_string(),
            is_from_me: false,
            chat_user: "15551234567".to_string(),
            sender: "15551234567:2@s.whatsapp.net".to_string(),
            message: Message::text(text),
        })
    }

    #[tokio::test]
    async fn forwards_events_and_resubscribes() {
        let source = Arc::new(ScriptedSource::new(vec![
            vec![SessionEvent::Connected, text_event("first")],
            vec![text_event("second")],
        ]));
        let webhook = Arc::new(RecordingWebhook {
            delivered: Mutex::new(Vec::new()),
            expected: 2,
            done: Notify::new(),
        });
        let forwarder = Arc::new(EventForwarder::new(webhook.clone()));

        let handle =
            spawn_event_forwarding_task(source.clone(), forwarder, Duration::from_millis(10));

        tokio::time::timeout(Duration::from_secs(5), webhook.done.notified())
            .await
            .expect("both messages delivered");
        handle.abort();

        let contents: Vec<String> = webhook
            .delivered
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.content.clone())
            .collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(source.subscriptions.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn subscription_failure_is_retried() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let webhook = Arc::new(RecordingWebhook {
            delivered: Mutex::new(Vec::new()),
            expected: 1,
            done: Notify::new(),
        });
        let forwarder = Arc::new(EventForwarder::new(webhook));

        let handle =
            spawn_event_forwarding_task(source.clone(), forwarder, Duration::from_millis(5));

        tokio::time::timeout(Duration::from_secs(5), async {
            while source.subscriptions.load(Ordering::SeqCst) < 3 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("resubscribed after failures");
        handle.abort();
    }
}
