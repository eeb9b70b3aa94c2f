//! Pluggable realtime transport.
//!
//! The connection manager only ever talks to a [`Transport`]; production
//! uses the WebSocket implementation, tests use the in-memory one. The
//! transport owns its own reconnect retry loop and backoff; the manager
//! is only responsible for re-synchronizing room membership when the
//! transport reports it is open again.

pub mod memory;
pub mod websocket;

use async_trait::async_trait;
use tokio::sync::mpsc;

use triphub_core::AppResult;

pub use memory::{MemoryTransport, MemoryTransportHandle};
pub use websocket::WebSocketTransport;

/// Low-level events a transport reports to the connection manager.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// The very first successful connect of this session.
    Opened,
    /// The transport dropped and reconnected on its own.
    Reconnected,
    /// A raw text frame arrived.
    Frame(String),
    /// The transport dropped; it will retry on its own.
    Closed,
    /// A transport-level failure (dial error, protocol error).
    Error(String),
}

/// A bidirectional realtime transport.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug + 'static {
    /// Start the transport with the given bearer credential.
    ///
    /// Returns the stream of [`TransportEvent`]s. May be called once per
    /// transport instance; the transport keeps retrying internally until
    /// [`Transport::shutdown`] is called.
    async fn connect(&self, credential: &str) -> AppResult<mpsc::Receiver<TransportEvent>>;

    /// Send a raw text frame. Fails if the transport is not currently open.
    async fn send(&self, frame: String) -> AppResult<()>;

    /// Tear the transport down cleanly and stop retrying.
    async fn shutdown(&self);
}
