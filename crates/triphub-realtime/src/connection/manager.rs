//! Connection manager: owns the one realtime connection per session.
//!
//! Hides transport-level reconnection from consumers: whenever the
//! transport reports it is open again, the manager replays the admin-room
//! join and any active trip-room join before anything else, so a client
//! that silently reconnected after a network blip keeps receiving events.

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use triphub_core::config::realtime::RealtimeConfig;
use triphub_core::types::id::TripId;
use triphub_core::{AppError, AppResult};
use triphub_entity::MessageType;

use crate::message::types::{ClientMessage, RealtimeEvent, ServerEvent};
use crate::transport::{Transport, TransportEvent};

/// Single source of truth for "are we connected" and "which rooms are we
/// in". One instance per authenticated session, injected into the views
/// that need it and torn down when the owner goes away.
#[derive(Debug)]
pub struct ConnectionManager {
    /// The underlying transport (WebSocket in production).
    transport: Arc<dyn Transport>,
    /// Lifecycle state, observable by any number of views.
    state_tx: watch::Sender<super::ConnectionState>,
    /// Rooms to (re)join after every transport open.
    rooms: Arc<Mutex<super::RoomMembership>>,
    /// Typed events for the consumer.
    events_tx: mpsc::Sender<RealtimeEvent>,
    /// Handed out once via [`Self::take_events`].
    events_rx: Mutex<Option<mpsc::Receiver<RealtimeEvent>>>,
    /// Cancels the current event loop on disconnect; replaced on every
    /// connect so the manager can be connected again afterwards.
    cancel: Mutex<CancellationToken>,
}

impl ConnectionManager {
    /// Creates a manager over the given transport.
    pub fn new(config: &RealtimeConfig, transport: Arc<dyn Transport>) -> Self {
        let (state_tx, _) = watch::channel(super::ConnectionState::Disconnected);
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer_size);
        Self {
            transport,
            state_tx,
            rooms: Arc::new(Mutex::new(super::RoomMembership::default())),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Takes the typed inbound event stream. Single consumer; panics on a
    /// second call in debug builds, returns `None` otherwise.
    pub fn take_events(&self) -> Option<mpsc::Receiver<RealtimeEvent>> {
        let taken = self
            .events_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        debug_assert!(taken.is_some(), "event stream taken twice");
        taken
    }

    /// A watch over the connection lifecycle state.
    pub fn state(&self) -> watch::Receiver<super::ConnectionState> {
        self.state_tx.subscribe()
    }

    /// The current lifecycle state.
    pub fn current_state(&self) -> super::ConnectionState {
        *self.state_tx.borrow()
    }

    /// Opens the connection with the given bearer credential.
    ///
    /// Without a credential this is a silent no-op from the caller's
    /// perspective: no connection is attempted. Calling while already
    /// active is likewise a no-op; there is one live connection per
    /// session.
    pub async fn connect(&self, credential: Option<&str>) {
        let credential = match credential {
            Some(c) if !c.is_empty() => c,
            _ => {
                warn!("Realtime connect skipped: no credential");
                return;
            }
        };

        if self.current_state().is_active() {
            warn!(state = %self.current_state(), "Realtime connect skipped: already active");
            return;
        }

        let session_id = Uuid::new_v4();
        self.state_tx.send_replace(super::ConnectionState::Connecting);

        // A fresh token per session; the one from a previous session was
        // cancelled by disconnect and must not govern this loop.
        let cancel = CancellationToken::new();
        *self.cancel.lock().unwrap_or_else(|e| e.into_inner()) = cancel.clone();

        // The admin room is part of every session from the first open.
        self.rooms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .join_admin();

        let transport_events = match self.transport.connect(credential).await {
            Ok(rx) => rx,
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Realtime connect failed");
                self.state_tx
                    .send_replace(super::ConnectionState::Disconnected);
                let _ = self
                    .events_tx
                    .send(RealtimeEvent::Error {
                        code: None,
                        message: e.to_string(),
                    })
                    .await;
                return;
            }
        };

        info!(session_id = %session_id, "Realtime session starting");

        tokio::spawn(Self::run(
            session_id,
            transport_events,
            Arc::clone(&self.transport),
            self.state_tx.clone(),
            Arc::clone(&self.rooms),
            self.events_tx.clone(),
            cancel,
        ));
    }

    /// Joins a trip's broadcast room, replacing any previously active trip
    /// room. Safe to call before the connection is open: the join is
    /// buffered in the membership record and replayed on every open.
    pub async fn join_trip_room(&self, trip_id: TripId) -> AppResult<()> {
        let replaced = self
            .rooms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .join_trip(trip_id.clone());

        if let Some(old) = replaced {
            debug!(old_trip = %old, new_trip = %trip_id, "Trip room membership replaced");
        }

        if self.current_state().is_connected() {
            self.send_frame(&ClientMessage::JoinTrip { trip_id }).await?;
        }
        Ok(())
    }

    /// Sends a chat message into a trip room.
    ///
    /// Requires an open connection; fails immediately with a connection
    /// error otherwise.
    pub async fn send_chat_message(
        &self,
        trip_id: TripId,
        message: String,
        message_type: MessageType,
    ) -> AppResult<()> {
        if !self.current_state().is_connected() {
            return Err(AppError::connection("Not connected"));
        }
        self.send_frame(&ClientMessage::SendMessage {
            trip_id,
            message,
            message_type,
        })
        .await
    }

    /// Tears the connection down cleanly. Must be called when the owning
    /// view unmounts to avoid leaking sockets across navigation.
    pub async fn disconnect(&self) {
        self.cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cancel();
        self.transport.shutdown().await;
        self.state_tx
            .send_replace(super::ConnectionState::Disconnected);
        info!("Realtime session closed");
    }

    async fn send_frame(&self, frame: &ClientMessage) -> AppResult<()> {
        let raw = serde_json::to_string(frame)?;
        self.transport.send(raw).await
    }

    /// The event loop: translates transport events into state transitions
    /// and typed consumer events. A malformed or unexpected inbound frame
    /// is logged and dropped; it never tears the loop down.
    async fn run(
        session_id: Uuid,
        mut transport_events: mpsc::Receiver<TransportEvent>,
        transport: Arc<dyn Transport>,
        state_tx: watch::Sender<super::ConnectionState>,
        rooms: Arc<Mutex<super::RoomMembership>>,
        events_tx: mpsc::Sender<RealtimeEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = transport_events.recv() => match event {
                    Some(e) => e,
                    None => break,
                },
            };

            match event {
                TransportEvent::Opened | TransportEvent::Reconnected => {
                    let reconnect = matches!(event, TransportEvent::Reconnected);
                    // Membership must be re-established before the session
                    // counts as ready again.
                    let frames = rooms
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .join_frames();
                    for frame in &frames {
                        match serde_json::to_string(frame) {
                            Ok(raw) => {
                                if let Err(e) = transport.send(raw).await {
                                    warn!(session_id = %session_id, error = %e, "Room join failed");
                                }
                            }
                            Err(e) => {
                                warn!(session_id = %session_id, error = %e, "Join frame serialization failed");
                            }
                        }
                    }
                    state_tx.send_replace(super::ConnectionState::Connected);
                    info!(
                        session_id = %session_id,
                        reconnect,
                        rooms = frames.len(),
                        "Realtime connection ready"
                    );
                }
                TransportEvent::Closed => {
                    if cancel.is_cancelled() {
                        state_tx.send_replace(super::ConnectionState::Disconnected);
                        break;
                    }
                    state_tx.send_replace(super::ConnectionState::Reconnecting);
                    warn!(session_id = %session_id, "Realtime connection dropped, transport retrying");
                }
                TransportEvent::Error(message) => {
                    warn!(session_id = %session_id, error = %message, "Transport error");
                    let _ = events_tx
                        .send(RealtimeEvent::Error {
                            code: None,
                            message,
                        })
                        .await;
                }
                TransportEvent::Frame(raw) => {
                    let server_event: ServerEvent = match serde_json::from_str(&raw) {
                        Ok(e) => e,
                        Err(e) => {
                            warn!(session_id = %session_id, error = %e, "Unparseable inbound frame dropped");
                            continue;
                        }
                    };

                    if server_event.is_auth_error() {
                        // A rejected credential is terminal, not a blip:
                        // surface it distinctly and stop the transport.
                        let message = match server_event {
                            ServerEvent::Error { message, .. } => message,
                            _ => unreachable!(),
                        };
                        warn!(session_id = %session_id, "Realtime credential rejected");
                        transport.shutdown().await;
                        state_tx.send_replace(super::ConnectionState::Disconnected);
                        let _ = events_tx.send(RealtimeEvent::AuthRejected { message }).await;
                        break;
                    }

                    let consumer_event = match server_event {
                        ServerEvent::AdminNotification(n) => RealtimeEvent::NotificationPushed(n),
                        ServerEvent::JoinRequestApproved { notification_id } => {
                            RealtimeEvent::JoinRequestResolved {
                                notification_id,
                                approved: true,
                            }
                        }
                        ServerEvent::JoinRequestRejected { notification_id } => {
                            RealtimeEvent::JoinRequestResolved {
                                notification_id,
                                approved: false,
                            }
                        }
                        ServerEvent::NewMessage(m) => RealtimeEvent::MessagePushed(m),
                        ServerEvent::MessageUpdated(m) => RealtimeEvent::MessageUpdated(m),
                        ServerEvent::Error { code, message } => {
                            RealtimeEvent::Error { code, message }
                        }
                    };

                    if events_tx.send(consumer_event).await.is_err() {
                        debug!(session_id = %session_id, "Event consumer gone, stopping loop");
                        break;
                    }
                }
            }
        }
    }
}
