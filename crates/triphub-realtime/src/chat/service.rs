//! Chat service: seeds the transcript over REST and sends messages over
//! the live connection with optimistic input handling.
//!
//! A send never inserts into the transcript locally; the message only
//! appears once the server confirms it with a push event. What *is*
//! optimistic is the input box: it clears eagerly on send and is restored
//! if the server rejects the message within a bounded error window.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, warn};

use triphub_core::config::realtime::RealtimeConfig;
use triphub_core::types::id::TripId;
use triphub_core::{AppError, AppResult};
use triphub_entity::{ChatMessage, MessageType};

use crate::connection::manager::ConnectionManager;
use crate::feedback::FeedbackSender;
use crate::gateway::ChatGateway;
use crate::message::types::RealtimeEvent;

use super::store::ChatStore;
use super::thread::{question_threads, QuestionThread};

/// A send whose server verdict is still pending.
#[derive(Debug)]
struct PendingSend {
    /// The text to restore if the server rejects the send.
    original_text: String,
    /// Distinguishes this send from later ones.
    generation: u64,
}

/// Owns one trip room's transcript, draft input, and send pipeline.
#[derive(Debug)]
pub struct ChatService {
    store: Mutex<ChatStore>,
    gateway: Arc<dyn ChatGateway>,
    manager: Arc<ConnectionManager>,
    feedback: FeedbackSender,
    /// The admin's in-progress input text.
    draft: Mutex<String>,
    /// Rollback listeners for sends still inside their error window,
    /// oldest first. One listener per send; a server rejection consumes
    /// the oldest.
    pending: Arc<Mutex<VecDeque<PendingSend>>>,
    send_generation: AtomicU64,
    error_window: Duration,
}

impl ChatService {
    /// Creates a service for one trip room.
    pub fn new(
        trip_id: TripId,
        config: &RealtimeConfig,
        gateway: Arc<dyn ChatGateway>,
        manager: Arc<ConnectionManager>,
        feedback: FeedbackSender,
    ) -> Self {
        Self {
            store: Mutex::new(ChatStore::new(trip_id)),
            gateway,
            manager,
            feedback,
            draft: Mutex::new(String::new()),
            pending: Arc::new(Mutex::new(VecDeque::new())),
            send_generation: AtomicU64::new(0),
            error_window: Duration::from_millis(config.send_error_window_ms),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ChatStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Joins this trip's broadcast room (buffered until the connection is
    /// open, replayed after reconnects).
    pub async fn join_room(&self) -> AppResult<()> {
        let trip_id = self.lock().trip_id().clone();
        self.manager.join_trip_room(trip_id).await
    }

    /// Fetches the transcript over REST and merges it in.
    pub async fn refresh(&self) -> AppResult<()> {
        let trip_id = self.lock().trip_id().clone();
        let batch = self.gateway.fetch_messages(&trip_id).await.map_err(|e| {
            self.feedback.error("load messages", e.message.clone());
            e
        })?;
        let added = self.lock().merge_batch(batch);
        debug!(trip_id = %trip_id, added, "Transcript refreshed");
        Ok(())
    }

    /// Replaces the draft input text.
    pub fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().unwrap_or_else(|e| e.into_inner()) = text.into();
    }

    /// The current draft input text.
    pub fn draft(&self) -> String {
        self.draft.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Sends the draft into the trip room.
    ///
    /// Requires an open connection: without one this fails immediately,
    /// surfaces one error, and leaves draft and transcript untouched.
    /// Otherwise the draft is cleared eagerly and a one-shot rollback
    /// listener is armed for the error window; a server rejection within
    /// the window restores the draft. The transcript is only ever
    /// extended by the server's confirming push event.
    pub async fn send(&self, message_type: MessageType) -> AppResult<()> {
        if !self.manager.current_state().is_connected() {
            let err = AppError::connection("Not connected");
            self.feedback.error("send message", err.message.clone());
            return Err(err);
        }

        let text = {
            let mut draft = self.draft.lock().unwrap_or_else(|e| e.into_inner());
            if draft.trim().is_empty() {
                return Ok(());
            }
            std::mem::take(&mut *draft)
        };

        let generation = self.send_generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(PendingSend {
                original_text: text.clone(),
                generation,
            });

        let trip_id = self.lock().trip_id().clone();
        if let Err(e) = self
            .manager
            .send_chat_message(trip_id, text.clone(), message_type)
            .await
        {
            // The frame never left: roll the input back right away.
            self.pending
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|p| p.generation != generation);
            self.set_draft(text);
            self.feedback.error("send message", e.message.clone());
            return Err(e);
        }

        // Disarm this send's rollback listener after the window, whether
        // or not an error ever arrives, so repeated sends cannot leak
        // listeners. Each task removes only its own generation.
        let pending = Arc::clone(&self.pending);
        let window = self.error_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            pending
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .retain(|p| p.generation != generation);
        });

        Ok(())
    }

    /// Applies an inbound realtime event. Notification events are ignored
    /// here.
    pub fn apply_event(&self, event: &RealtimeEvent) {
        match event {
            RealtimeEvent::MessagePushed(message) => {
                if self.lock().apply_push(message.clone()) {
                    debug!(id = %message.id, "Chat message pushed");
                }
            }
            RealtimeEvent::MessageUpdated(message) => {
                if !self.lock().apply_update(message.clone()) {
                    debug!(id = %message.id, "Update for unknown message ignored");
                }
            }
            RealtimeEvent::Error { message, .. } => {
                // Rejections arrive in send order, so the oldest armed
                // send is the one this error belongs to.
                let rolled_back = self
                    .pending
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .pop_front();
                if let Some(p) = rolled_back {
                    warn!("Send rejected by server, restoring input");
                    self.set_draft(p.original_text);
                    self.feedback.error("send message", message.clone());
                }
            }
            _ => {}
        }
    }

    /// The transcript, oldest first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.lock().messages().to_vec()
    }

    /// Derived question/answer threads, computed on demand.
    pub fn threads(&self) -> Vec<QuestionThread> {
        question_threads(self.lock().messages())
    }
}
