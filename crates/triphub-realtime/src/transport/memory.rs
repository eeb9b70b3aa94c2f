//! In-memory transport for tests and offline development.
//!
//! A [`MemoryTransportHandle`] plays the role of the server: it scripts
//! opens, reconnects, pushed events, and errors, and records every frame
//! the client side emits.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use triphub_core::{AppError, AppResult};

use crate::message::types::ServerEvent;

use super::TransportEvent;

/// Shared state between the transport and its handle.
#[derive(Debug, Default)]
struct Shared {
    /// Every frame sent by the client, in order.
    sent: Mutex<Vec<String>>,
    /// The credential passed to `connect`, if any.
    credential: Mutex<Option<String>>,
    /// Whether the scripted server currently considers the link open.
    open: Mutex<bool>,
    /// Sender for the stream handed out by the latest `connect`. The
    /// scripted server always talks to the latest stream.
    events_tx: Mutex<Option<mpsc::Sender<TransportEvent>>>,
}

/// An in-process [`Transport`](super::Transport) backed by channels.
#[derive(Debug)]
pub struct MemoryTransport {
    shared: Arc<Shared>,
}

/// Test-side controller for a [`MemoryTransport`].
#[derive(Debug, Clone)]
pub struct MemoryTransportHandle {
    shared: Arc<Shared>,
}

impl MemoryTransport {
    /// Creates a transport plus its scripting handle.
    pub fn new() -> (Self, MemoryTransportHandle) {
        let shared = Arc::new(Shared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            MemoryTransportHandle { shared },
        )
    }
}

#[async_trait::async_trait]
impl super::Transport for MemoryTransport {
    async fn connect(&self, credential: &str) -> AppResult<mpsc::Receiver<TransportEvent>> {
        *self.shared.credential.lock().await = Some(credential.to_string());
        let (events_tx, events_rx) = mpsc::channel(64);
        *self.shared.events_tx.lock().await = Some(events_tx);
        Ok(events_rx)
    }

    async fn send(&self, frame: String) -> AppResult<()> {
        if !*self.shared.open.lock().await {
            return Err(AppError::connection("Memory transport is not open"));
        }
        self.shared.sent.lock().await.push(frame);
        Ok(())
    }

    async fn shutdown(&self) {
        *self.shared.open.lock().await = false;
        // Closing the sender ends the stream from the matching connect.
        *self.shared.events_tx.lock().await = None;
    }
}

impl MemoryTransportHandle {
    async fn emit(&self, event: TransportEvent) {
        let tx = self.shared.events_tx.lock().await.clone();
        if let Some(tx) = tx {
            let _ = tx.send(event).await;
        }
    }

    /// Scripts a successful open of the latest connect.
    pub async fn open(&self) {
        *self.shared.open.lock().await = true;
        self.emit(TransportEvent::Opened).await;
    }

    /// Scripts a drop followed by an automatic reconnect.
    pub async fn drop_and_reconnect(&self) {
        *self.shared.open.lock().await = false;
        self.emit(TransportEvent::Closed).await;
        *self.shared.open.lock().await = true;
        self.emit(TransportEvent::Reconnected).await;
    }

    /// Scripts a transport-level drop without reconnecting yet.
    pub async fn drop_link(&self) {
        *self.shared.open.lock().await = false;
        self.emit(TransportEvent::Closed).await;
    }

    /// Pushes a typed server event as a frame.
    pub async fn push(&self, event: ServerEvent) {
        let frame = serde_json::to_string(&event).expect("server event serializes");
        self.emit(TransportEvent::Frame(frame)).await;
    }

    /// Pushes a raw (possibly malformed) frame.
    pub async fn push_raw(&self, frame: impl Into<String>) {
        self.emit(TransportEvent::Frame(frame.into())).await;
    }

    /// Scripts a transport-level error.
    pub async fn error(&self, message: impl Into<String>) {
        self.emit(TransportEvent::Error(message.into())).await;
    }

    /// Returns all frames the client sent so far, oldest first.
    pub async fn sent_frames(&self) -> Vec<String> {
        self.shared.sent.lock().await.clone()
    }

    /// Clears the recorded outbound frames.
    pub async fn clear_sent(&self) {
        self.shared.sent.lock().await.clear();
    }

    /// Returns the credential the client connected with.
    pub async fn credential(&self) -> Option<String> {
        self.shared.credential.lock().await.clone()
    }

    /// Waits until at least `count` frames were sent, or panics after one
    /// second. Keeps test assertions free of sleeps.
    pub async fn wait_for_sent(&self, count: usize) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
        loop {
            let frames = self.sent_frames().await;
            if frames.len() >= count {
                return frames;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("timed out waiting for {count} sent frames, got {}", frames.len());
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }
}
