//! REST gateway seams.
//!
//! The state machines talk to the backend only through these traits, so
//! every merge/ordering/rollback rule is testable without a network.
//! `triphub-api` provides the production implementations over HTTP.

use async_trait::async_trait;

use triphub_core::types::id::{NotificationId, TripId};
use triphub_core::AppResult;
use triphub_entity::{ChatMessage, Notification};

/// A fetched notification batch plus the server's advisory unread count.
#[derive(Debug, Clone)]
pub struct NotificationBatch {
    /// The notifications, in whatever order the server returned them.
    pub notifications: Vec<Notification>,
    /// Server-side unread counter; advisory only.
    pub unread_count: Option<i64>,
}

/// Backend operations for the notification state machine.
#[async_trait]
pub trait NotificationGateway: Send + Sync + std::fmt::Debug + 'static {
    /// `GET /notifications`.
    async fn fetch(&self) -> AppResult<NotificationBatch>;

    /// `PUT /notifications/:id/read`.
    async fn mark_read(&self, id: &NotificationId) -> AppResult<()>;

    /// `PUT /notifications/read-all`.
    async fn mark_all_read(&self) -> AppResult<()>;

    /// `PUT /notifications/:id/favorite`. Returns the server's
    /// authoritative favorite flag after the toggle.
    async fn toggle_favorite(&self, id: &NotificationId) -> AppResult<bool>;

    /// `POST /notifications/:id/approve`.
    async fn approve_notification(&self, id: &NotificationId) -> AppResult<()>;

    /// `POST /notifications/:id/reject`.
    async fn reject_notification(&self, id: &NotificationId) -> AppResult<()>;

    /// `POST /community-trip/:tripId/approve`.
    async fn approve_trip(&self, trip_id: &TripId) -> AppResult<()>;

    /// `POST /community-trip/:tripId/reject`.
    async fn reject_trip(&self, trip_id: &TripId) -> AppResult<()>;
}

/// Backend operations for the chat state machine.
#[async_trait]
pub trait ChatGateway: Send + Sync + std::fmt::Debug + 'static {
    /// `GET /community-trip/:tripId/messages`.
    async fn fetch_messages(&self, trip_id: &TripId) -> AppResult<Vec<ChatMessage>>;
}
