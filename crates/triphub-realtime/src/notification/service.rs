//! Notification service: round-trips actions through the backend and
//! applies them to the canonical store only on success.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use triphub_core::types::filter::NotificationFilter;
use triphub_core::types::id::NotificationId;
use triphub_core::{AppError, AppResult};
use triphub_entity::{ActionTaken, ApprovalRoute, Notification};

use crate::feedback::FeedbackSender;
use crate::gateway::NotificationGateway;
use crate::message::types::RealtimeEvent;

use super::store::NotificationStore;

/// Owns the notification store and mediates every mutation.
///
/// Server round-trips happen first; the store changes only when they
/// succeed. Any failure leaves the canonical list exactly as it was and
/// surfaces a user-visible error through the feedback stream.
#[derive(Debug)]
pub struct NotificationService {
    store: Mutex<NotificationStore>,
    gateway: Arc<dyn NotificationGateway>,
    feedback: FeedbackSender,
}

impl NotificationService {
    /// Creates a service over a gateway and a feedback stream.
    pub fn new(gateway: Arc<dyn NotificationGateway>, feedback: FeedbackSender) -> Self {
        Self {
            store: Mutex::new(NotificationStore::new()),
            gateway,
            feedback,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NotificationStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn fail(&self, context: &str, err: AppError) -> AppError {
        self.feedback.error(context, err.message.clone());
        err
    }

    /// Fetches the list from the backend and merges it into the store.
    pub async fn refresh(&self) -> AppResult<()> {
        let batch = self
            .gateway
            .fetch()
            .await
            .map_err(|e| self.fail("load notifications", e))?;

        let mut store = self.lock();
        let added = store.seed(batch.notifications);
        let recomputed = store.unread_count();
        debug!(added, total = store.len(), "Notification list refreshed");

        // The server counter is advisory; the recomputed one is canonical.
        if let Some(server_count) = batch.unread_count {
            if server_count >= 0 && server_count as usize != recomputed {
                warn!(
                    server = server_count,
                    recomputed,
                    "Server unread count disagrees with recomputed count"
                );
            }
        }
        Ok(())
    }

    /// Marks one notification read. Already-read entries and unknown ids
    /// are a no-op without a round trip.
    pub async fn mark_read(&self, id: &NotificationId) -> AppResult<()> {
        if matches!(self.lock().get(id), None | Some(Notification { is_read: true, .. })) {
            return Ok(());
        }
        self.gateway
            .mark_read(id)
            .await
            .map_err(|e| self.fail("mark notification read", e))?;
        self.lock().mark_read(id);
        Ok(())
    }

    /// Marks every notification read in one backend call.
    pub async fn mark_all_read(&self) -> AppResult<()> {
        if self.lock().unread_count() == 0 {
            return Ok(());
        }
        self.gateway
            .mark_all_read()
            .await
            .map_err(|e| self.fail("mark all notifications read", e))?;
        let transitioned = self.lock().mark_all_read();
        debug!(transitioned, "All notifications marked read");
        Ok(())
    }

    /// Toggles the favorite flag through the backend; the store takes the
    /// server's authoritative answer so the flag stays consistent across
    /// devices.
    pub async fn toggle_favorite(&self, id: &NotificationId) -> AppResult<()> {
        if !self.lock().contains(id) {
            return Err(self.fail(
                "favorite notification",
                AppError::not_found(format!("Unknown notification {id}")),
            ));
        }
        let is_favorite = self
            .gateway
            .toggle_favorite(id)
            .await
            .map_err(|e| self.fail("favorite notification", e))?;
        self.lock().set_favorite(id, is_favorite);
        Ok(())
    }

    /// Approves an actionable notification.
    pub async fn approve(&self, id: &NotificationId) -> AppResult<()> {
        self.moderate(id, ActionTaken::Approved).await
    }

    /// Rejects an actionable notification.
    pub async fn reject(&self, id: &NotificationId) -> AppResult<()> {
        self.moderate(id, ActionTaken::Rejected).await
    }

    /// Routes an approve/reject to the right backend operation based on
    /// the notification kind, then records the terminal decision.
    async fn moderate(&self, id: &NotificationId, action: ActionTaken) -> AppResult<()> {
        let (route, trip_id) = {
            let store = self.lock();
            let notification = store.get(id).ok_or_else(|| {
                AppError::not_found(format!("Unknown notification {id}"))
            })?;

            if notification.action_taken.is_terminal() {
                // Terminal means terminal: never retried, never re-sent.
                debug!(id = %id, "Moderation skipped, decision already taken");
                return Ok(());
            }

            let route = notification.kind.approval_route().ok_or_else(|| {
                AppError::validation(format!("Notification {id} is not actionable"))
            })?;
            let trip_id = notification.trip.as_ref().map(|t| t.id.clone());
            (route, trip_id)
        };

        let context = match action {
            ActionTaken::Approved => "approve request",
            _ => "reject request",
        };

        let result = match route {
            ApprovalRoute::TripModeration => {
                let trip_id = trip_id.ok_or_else(|| {
                    self.fail(
                        context,
                        AppError::validation(format!("Notification {id} has no trip reference")),
                    )
                })?;
                match action {
                    ActionTaken::Approved => self.gateway.approve_trip(&trip_id).await,
                    _ => self.gateway.reject_trip(&trip_id).await,
                }
            }
            ApprovalRoute::Notification => match action {
                ActionTaken::Approved => self.gateway.approve_notification(id).await,
                _ => self.gateway.reject_notification(id).await,
            },
        };

        result.map_err(|e| self.fail(context, e))?;
        self.lock().resolve(id, action);
        Ok(())
    }

    /// Applies an inbound realtime event. Chat events are ignored here.
    pub fn apply_event(&self, event: &RealtimeEvent) {
        match event {
            RealtimeEvent::NotificationPushed(notification) => {
                let inserted = self.lock().apply_push(notification.clone());
                if inserted {
                    debug!(id = %notification.id, "Notification pushed");
                }
            }
            RealtimeEvent::JoinRequestResolved {
                notification_id,
                approved,
            } => {
                // The decision was made elsewhere (another device/admin);
                // mirror it locally.
                let action = if *approved {
                    ActionTaken::Approved
                } else {
                    ActionTaken::Rejected
                };
                self.lock().resolve(notification_id, action);
            }
            RealtimeEvent::Error { message, .. } => {
                debug!(message = %message, "Server error event observed");
            }
            _ => {}
        }
    }

    /// Recomputed unread count.
    pub fn unread_count(&self) -> usize {
        self.lock().unread_count()
    }

    /// Recomputed favorite count.
    pub fn favorite_count(&self) -> usize {
        self.lock().favorite_count()
    }

    /// A filtered snapshot of the canonical list for rendering.
    pub fn filtered(&self, filter: NotificationFilter) -> Vec<Notification> {
        self.lock().filtered(filter).into_iter().cloned().collect()
    }

    /// A snapshot of one notification.
    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.lock().get(id).cloned()
    }

    /// Number of notifications held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
