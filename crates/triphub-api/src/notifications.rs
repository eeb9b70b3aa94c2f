//! HTTP notification gateway.

use async_trait::async_trait;
use serde::Deserialize;

use triphub_core::types::id::{NotificationId, TripId};
use triphub_core::AppResult;
use triphub_entity::Notification;
use triphub_realtime::gateway::{NotificationBatch, NotificationGateway};

use crate::client::ApiClient;

/// Payload of the favorite-toggle endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritePayload {
    is_favorite: bool,
}

/// Notification operations over the admin REST API.
#[derive(Debug, Clone)]
pub struct HttpNotificationGateway {
    client: ApiClient,
}

impl HttpNotificationGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationGateway for HttpNotificationGateway {
    async fn fetch(&self) -> AppResult<NotificationBatch> {
        let envelope = self.client.get::<Vec<Notification>>("/notifications").await?;
        Ok(NotificationBatch {
            notifications: envelope.data,
            unread_count: envelope.unread_count,
        })
    }

    async fn mark_read(&self, id: &NotificationId) -> AppResult<()> {
        self.client
            .put::<serde_json::Value>(&format!("/notifications/{}/read", id.as_str()))
            .await?;
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.client
            .put::<serde_json::Value>("/notifications/read-all")
            .await?;
        Ok(())
    }

    async fn toggle_favorite(&self, id: &NotificationId) -> AppResult<bool> {
        let envelope = self
            .client
            .put::<FavoritePayload>(&format!("/notifications/{}/favorite", id.as_str()))
            .await?;
        Ok(envelope.data.is_favorite)
    }

    async fn approve_notification(&self, id: &NotificationId) -> AppResult<()> {
        self.client
            .post::<serde_json::Value>(&format!("/notifications/{}/approve", id.as_str()))
            .await?;
        Ok(())
    }

    async fn reject_notification(&self, id: &NotificationId) -> AppResult<()> {
        self.client
            .post::<serde_json::Value>(&format!("/notifications/{}/reject", id.as_str()))
            .await?;
        Ok(())
    }

    async fn approve_trip(&self, trip_id: &TripId) -> AppResult<()> {
        self.client
            .post::<serde_json::Value>(&format!("/community-trip/{}/approve", trip_id.as_str()))
            .await?;
        Ok(())
    }

    async fn reject_trip(&self, trip_id: &TripId) -> AppResult<()> {
        self.client
            .post::<serde_json::Value>(&format!("/community-trip/{}/reject", trip_id.as_str()))
            .await?;
        Ok(())
    }
}
