//! WebSocket transport over tokio-tungstenite.
//!
//! Owns the dial/reconnect loop: exponential backoff between attempts,
//! bearer credential on the upgrade request, and a distinct
//! [`TransportEvent::Reconnected`] after every drop so the connection
//! manager can replay room joins.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, info, warn};
use uuid::Uuid;

use triphub_core::config::realtime::RealtimeConfig;
use triphub_core::error::ErrorKind;
use triphub_core::{AppError, AppResult};

use super::TransportEvent;

/// Production transport: a self-healing WebSocket client.
#[derive(Debug)]
pub struct WebSocketTransport {
    /// WebSocket endpoint URL.
    url: String,
    /// Backoff bounds.
    backoff_initial: Duration,
    backoff_max: Duration,
    /// Sender for outbound frames; `None` while the socket is down.
    outbound: Arc<Mutex<Option<mpsc::Sender<String>>>>,
    /// Cancellation for the current dial loop; replaced on every connect
    /// so a transport shut down earlier can be connected again.
    cancel: Mutex<tokio_util::sync::CancellationToken>,
    /// Event buffer size.
    event_buffer: usize,
}

impl WebSocketTransport {
    /// Creates a transport from configuration.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            url: config.url.clone(),
            backoff_initial: Duration::from_millis(config.reconnect_backoff_initial_ms),
            backoff_max: Duration::from_millis(config.reconnect_backoff_max_ms),
            outbound: Arc::new(Mutex::new(None)),
            cancel: Mutex::new(tokio_util::sync::CancellationToken::new()),
            event_buffer: config.event_buffer_size,
        }
    }

    /// Runs the dial loop until cancelled.
    async fn run(
        url: String,
        credential: String,
        backoff_initial: Duration,
        backoff_max: Duration,
        outbound: Arc<Mutex<Option<mpsc::Sender<String>>>>,
        cancel: tokio_util::sync::CancellationToken,
        events: mpsc::Sender<TransportEvent>,
    ) {
        let mut backoff = backoff_initial;
        let mut connected_before = false;

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let attempt_id = Uuid::new_v4();
            debug!(attempt_id = %attempt_id, url = %url, "Dialing realtime endpoint");

            let request = match Self::build_request(&url, &credential) {
                Ok(r) => r,
                Err(e) => {
                    let _ = events.send(TransportEvent::Error(e.to_string())).await;
                    break;
                }
            };

            match connect_async(request).await {
                Ok((stream, _response)) => {
                    backoff = backoff_initial;

                    let (out_tx, mut out_rx) = mpsc::channel::<String>(64);
                    *outbound.lock().await = Some(out_tx);

                    let event = if connected_before {
                        TransportEvent::Reconnected
                    } else {
                        TransportEvent::Opened
                    };
                    connected_before = true;
                    info!(attempt_id = %attempt_id, "Realtime transport open");
                    if events.send(event).await.is_err() {
                        break;
                    }

                    let (mut sink, mut source) = stream.split();
                    loop {
                        tokio::select! {
                            _ = cancel.cancelled() => {
                                let _ = sink.send(Message::Close(None)).await;
                                return;
                            }
                            frame = out_rx.recv() => {
                                match frame {
                                    Some(text) => {
                                        if let Err(e) = sink.send(Message::Text(text.into())).await {
                                            warn!(error = %e, "WebSocket send failed");
                                            break;
                                        }
                                    }
                                    None => break,
                                }
                            }
                            inbound = source.next() => {
                                match inbound {
                                    Some(Ok(Message::Text(text))) => {
                                        if events
                                            .send(TransportEvent::Frame(text.to_string()))
                                            .await
                                            .is_err()
                                        {
                                            return;
                                        }
                                    }
                                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                                    Some(Ok(Message::Close(_))) | None => break,
                                    Some(Ok(_)) => {}
                                    Some(Err(e)) => {
                                        warn!(error = %e, "WebSocket read failed");
                                        break;
                                    }
                                }
                            }
                        }
                    }

                    *outbound.lock().await = None;
                    if events.send(TransportEvent::Closed).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(attempt_id = %attempt_id, error = %e, "Realtime dial failed");
                    if events
                        .send(TransportEvent::Error(e.to_string()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(backoff_max);
        }
    }

    fn build_request(
        url: &str,
        credential: &str,
    ) -> AppResult<tokio_tungstenite::tungstenite::handshake::client::Request> {
        let mut request = url
            .into_client_request()
            .map_err(|e| AppError::with_source(ErrorKind::Connection, "Invalid realtime URL", e))?;
        let header = format!("Bearer {credential}")
            .parse()
            .map_err(|_| AppError::connection("Credential is not a valid header value"))?;
        request.headers_mut().insert("Authorization", header);
        Ok(request)
    }
}

#[async_trait::async_trait]
impl super::Transport for WebSocketTransport {
    async fn connect(&self, credential: &str) -> AppResult<mpsc::Receiver<TransportEvent>> {
        let (events_tx, events_rx) = mpsc::channel(self.event_buffer);

        // A fresh token per dial loop; stop any loop from an earlier
        // connect so there is at most one.
        let cancel = tokio_util::sync::CancellationToken::new();
        {
            let mut guard = self.cancel.lock().await;
            guard.cancel();
            *guard = cancel.clone();
        }

        tokio::spawn(Self::run(
            self.url.clone(),
            credential.to_string(),
            self.backoff_initial,
            self.backoff_max,
            Arc::clone(&self.outbound),
            cancel,
            events_tx,
        ));

        Ok(events_rx)
    }

    async fn send(&self, frame: String) -> AppResult<()> {
        let guard = self.outbound.lock().await;
        match guard.as_ref() {
            Some(tx) => tx
                .send(frame)
                .await
                .map_err(|_| AppError::connection("Realtime transport closed while sending")),
            None => Err(AppError::connection("Realtime transport is not open")),
        }
    }

    async fn shutdown(&self) {
        self.cancel.lock().await.cancel();
        *self.outbound.lock().await = None;
    }
}
