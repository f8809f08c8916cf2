//! Session daemon client
//!
//! Request/response calls share one lazily opened connection. Event
//! subscriptions get a dedicated connection whose lines are decoded by a
//! background task.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::{MediaKind, Message, RecipientAddress, SessionEvent, UploadResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, instrument, warn};

use crate::error::SessionError;
use crate::types::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, SendParams, SendResult,
    SessionClientConfig, UploadParams, WireMessage, WireUploadResult, decode_event,
};

/// Buffered events per subscription before the reader applies backpressure
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Client for the session daemon's JSON-RPC socket
pub struct SessionClient {
    config: SessionClientConfig,
    /// Connection for request/response calls (lazily initialized)
    connection: Mutex<Option<Connection>>,
    request_id: AtomicU64,
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl Connection {
    async fn open(path: &str) -> Result<Self, SessionError> {
        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| SessionError::connection(format!("{path}: {e}")))?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    async fn write_line(&mut self, line: &str) -> Result<(), SessionError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read one line; `None` when the daemon closed the socket
    async fn read_line(&mut self) -> Result<Option<String>, SessionError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        Ok((read > 0).then_some(line))
    }
}

impl SessionClient {
    /// Create a new session client
    #[must_use]
    pub fn new(config: SessionClientConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
            request_id: AtomicU64::new(1),
        }
    }

    /// Configured socket path
    #[must_use]
    pub fn socket_path(&self) -> &str {
        &self.config.socket_path
    }

    /// Check whether the daemon accepts connections
    #[instrument(skip(self), fields(socket = %self.config.socket_path))]
    pub async fn is_available(&self) -> bool {
        let path = Path::new(&self.config.socket_path);
        if !path.exists() {
            debug!("Session socket does not exist");
            return false;
        }

        match UnixStream::connect(path).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Failed to connect to session daemon");
                false
            },
        }
    }

    /// Send a message envelope to a recipient
    #[instrument(skip(self, message), fields(recipient = %recipient))]
    pub async fn send_message(
        &self,
        recipient: &RecipientAddress,
        message: &Message,
    ) -> Result<SendResult, SessionError> {
        let params = SendParams {
            recipient: recipient.to_string(),
            message: WireMessage::from(message),
        };
        self.call_method("send", params).await
    }

    /// Encrypt and upload media through the daemon
    #[instrument(skip(self, data), fields(size = data.len(), kind = kind.as_str()))]
    pub async fn upload(&self, data: &[u8], kind: MediaKind) -> Result<UploadResult, SessionError> {
        let params = UploadParams::new(kind.as_str(), data);
        let wire: WireUploadResult = self.call_method("upload", params).await?;
        UploadResult::try_from(wire)
    }

    /// Subscribe to session events.
    ///
    /// Opens a dedicated connection. The returned channel closes when the
    /// daemon closes that connection.
    #[instrument(skip(self), fields(socket = %self.config.socket_path))]
    pub async fn subscribe(&self) -> Result<mpsc::Receiver<SessionEvent>, SessionError> {
        let mut conn = Connection::open(&self.config.socket_path).await?;

        let id = self.next_id();
        let request = JsonRpcRequest::new("subscribe", serde_json::json!({}), id);
        conn.write_line(&serde_json::to_string(&request)?).await?;

        let line = tokio::time::timeout(self.timeout(), conn.read_line())
            .await
            .map_err(|_| SessionError::Timeout)??
            .ok_or_else(|| SessionError::connection("Connection closed by daemon"))?;
        let _: serde_json::Value = Self::parse_response(&line, id)?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(read_events(conn, tx));
        debug!("Subscribed to session events");
        Ok(rx)
    }

    /// Drop the shared connection (it will be re-established on next request)
    pub async fn close(&self) {
        let mut conn_guard = self.connection.lock().await;
        *conn_guard = None;
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    const fn timeout(&self) -> Duration {
        Duration::from_millis(self.config.timeout_ms)
    }

    async fn call_method<P, R>(&self, method: &str, params: P) -> Result<R, SessionError>
    where
        P: serde::Serialize + Send,
        R: serde::de::DeserializeOwned,
    {
        let id = self.next_id();
        let request = JsonRpcRequest::new(method, params, id);
        let request_json = serde_json::to_string(&request)?;

        debug!(method, id, "Sending JSON-RPC request");

        let Ok(response) =
            tokio::time::timeout(self.timeout(), self.send_request(&request_json, id)).await
        else {
            // Any late reply to this id is skipped by the next caller
            self.close().await;
            return Err(SessionError::Timeout);
        };

        Self::parse_response(&response?, id)
    }

    fn parse_response<R>(line: &str, id: u64) -> Result<R, SessionError>
    where
        R: serde::de::DeserializeOwned,
    {
        let response: JsonRpcResponse<R> = serde_json::from_str(line)?;

        if let Some(got) = response.id.filter(|got| *got != id) {
            return Err(SessionError::protocol(format!(
                "Response id mismatch: expected {id}, got {got}"
            )));
        }

        if let Some(error) = response.error {
            error!(code = error.code, message = %error.message, "JSON-RPC error");
            return Err(SessionError::daemon(error.code, error.message));
        }

        response
            .result
            .ok_or_else(|| SessionError::protocol("Response contained neither result nor error"))
    }

    /// Write `request` and return the reply line carrying `id`.
    ///
    /// Replies to earlier, timed-out requests are skipped. A reply with a
    /// later id means the stream is out of step, so the connection is dropped.
    async fn send_request(&self, request: &str, id: u64) -> Result<String, SessionError> {
        let mut conn_guard = self.connection.lock().await;

        if conn_guard.is_none() {
            *conn_guard = Some(Connection::open(&self.config.socket_path).await?);
        }

        let Some(conn) = conn_guard.as_mut() else {
            return Err(SessionError::protocol("Connection state error"));
        };

        let exchange = async {
            conn.write_line(request).await?;
            loop {
                let Some(line) = conn.read_line().await? else {
                    return Err(SessionError::connection("Connection closed by daemon"));
                };
                match reply_id(&line) {
                    Some(got) if got < id => {
                        debug!(expected = id, stale = got, "Skipping stale JSON-RPC reply");
                    },
                    Some(got) if got > id => {
                        return Err(SessionError::protocol(format!(
                            "Response id mismatch: expected {id}, got {got}"
                        )));
                    },
                    _ => return Ok(line),
                }
            }
        };

        let result = exchange.await;
        if result.is_err() {
            *conn_guard = None;
        }
        result
    }
}

/// Id of a reply line, if it has a numeric one
fn reply_id(line: &str) -> Option<u64> {
    #[derive(serde::Deserialize)]
    struct ReplyId {
        id: Option<u64>,
    }

    serde_json::from_str::<ReplyId>(line).ok().and_then(|reply| reply.id)
}

/// Forward `event` notifications until the daemon hangs up or the receiver
/// is dropped
async fn read_events(mut conn: Connection, tx: mpsc::Sender<SessionEvent>) {
    loop {
        let line = match conn.read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Session daemon closed the event stream");
                return;
            },
            Err(e) => {
                warn!(error = %e, "Event stream read failed");
                return;
            },
        };

        let notification: JsonRpcNotification = match serde_json::from_str(&line) {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Skipping malformed event line");
                continue;
            },
        };

        if notification.method != "event" {
            debug!(method = %notification.method, "Ignoring notification");
            continue;
        }

        match decode_event(notification.params) {
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    debug!("Event receiver dropped");
                    return;
                }
            },
            Err(e) => warn!(error = %e, "Skipping undecodable event"),
        }
    }
}

impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("socket_path", &self.config.socket_path)
            .field("timeout_ms", &self.config.timeout_ms)
            .finish_non_exhaustive()
    }
}
