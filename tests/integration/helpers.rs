//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::mpsc;

use triphub_core::config::realtime::RealtimeConfig;
use triphub_core::types::id::{MessageId, NotificationId, TripId, UserId};
use triphub_core::{AppError, AppResult};
use triphub_entity::{
    ChatMessage, MessageAuthor, MessageType, Notification, NotificationKind, RequesterRef, TripRef,
};
use triphub_realtime::gateway::{ChatGateway, NotificationBatch, NotificationGateway};
use triphub_realtime::transport::{MemoryTransport, MemoryTransportHandle};
use triphub_realtime::{
    feedback_channel, ChatService, ConnectionManager, NotificationService, RealtimeEvent, UiEvent,
};

/// The trip room every test chat service is bound to.
pub const TRIP: &str = "t1";

/// Scripted in-memory backend implementing both REST gateways.
#[derive(Debug, Default)]
pub struct FakeBackend {
    notifications: Mutex<Vec<Notification>>,
    unread_count: Mutex<Option<i64>>,
    messages: Mutex<Vec<ChatMessage>>,
    calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    pub fn set_unread_count(&self, count: i64) {
        *self.unread_count.lock().unwrap() = Some(count);
    }

    pub fn seed_messages(&self, messages: Vec<ChatMessage>) {
        *self.messages.lock().unwrap() = messages;
    }

    /// Make the next gateway call fail with the given message.
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// Every gateway call recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(AppError::external_service(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NotificationGateway for FakeBackend {
    async fn fetch(&self) -> AppResult<NotificationBatch> {
        self.record("fetch".to_string())?;
        Ok(NotificationBatch {
            notifications: self.notifications.lock().unwrap().clone(),
            unread_count: *self.unread_count.lock().unwrap(),
        })
    }

    async fn mark_read(&self, id: &NotificationId) -> AppResult<()> {
        self.record(format!("mark-read:{id}"))
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        self.record("mark-all-read".to_string())
    }

    async fn toggle_favorite(&self, id: &NotificationId) -> AppResult<bool> {
        self.record(format!("toggle-favorite:{id}"))?;
        let mut notifications = self.notifications.lock().unwrap();
        let entry = notifications.iter_mut().find(|n| n.id == *id);
        Ok(match entry {
            Some(n) => {
                n.is_favorite = !n.is_favorite;
                n.is_favorite
            }
            None => true,
        })
    }

    async fn approve_notification(&self, id: &NotificationId) -> AppResult<()> {
        self.record(format!("approve-notification:{id}"))
    }

    async fn reject_notification(&self, id: &NotificationId) -> AppResult<()> {
        self.record(format!("reject-notification:{id}"))
    }

    async fn approve_trip(&self, trip_id: &TripId) -> AppResult<()> {
        self.record(format!("approve-trip:{trip_id}"))
    }

    async fn reject_trip(&self, trip_id: &TripId) -> AppResult<()> {
        self.record(format!("reject-trip:{trip_id}"))
    }
}

#[async_trait]
impl ChatGateway for FakeBackend {
    async fn fetch_messages(&self, trip_id: &TripId) -> AppResult<Vec<ChatMessage>> {
        self.record(format!("fetch-messages:{trip_id}"))?;
        Ok(self.messages.lock().unwrap().clone())
    }
}

/// Fully wired test fixture over an in-memory transport.
pub struct TestApp {
    pub manager: Arc<ConnectionManager>,
    pub handle: MemoryTransportHandle,
    pub backend: Arc<FakeBackend>,
    pub notifications: Arc<NotificationService>,
    pub chat: Arc<ChatService>,
    pub events: mpsc::Receiver<RealtimeEvent>,
    pub toasts: mpsc::Receiver<UiEvent>,
}

impl TestApp {
    pub fn new() -> Self {
        // Short rollback window so expiry tests stay fast.
        let config = RealtimeConfig {
            send_error_window_ms: 200,
            ..RealtimeConfig::default()
        };
        let (transport, handle) = MemoryTransport::new();
        let manager = Arc::new(ConnectionManager::new(&config, Arc::new(transport)));
        let events = manager.take_events().expect("event stream taken once");
        let (feedback, toasts) = feedback_channel(32);

        let backend = Arc::new(FakeBackend::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::clone(&backend) as Arc<dyn NotificationGateway>,
            feedback.clone(),
        ));
        let chat = Arc::new(ChatService::new(
            TripId::new(TRIP),
            &config,
            Arc::clone(&backend) as Arc<dyn ChatGateway>,
            Arc::clone(&manager),
            feedback,
        ));

        Self {
            manager,
            handle,
            backend,
            notifications,
            chat,
            events,
            toasts,
        }
    }

    /// Connect with a test token and wait for the admin-room join frame.
    pub async fn connect(&self) {
        self.manager.connect(Some("test-token")).await;
        self.handle.open().await;
        self.handle.wait_for_sent(1).await;
    }

    /// Receive the next typed event and feed it to both state machines.
    pub async fn pump(&mut self) -> RealtimeEvent {
        let event = self.events.recv().await.expect("event stream open");
        self.notifications.apply_event(&event);
        self.chat.apply_event(&event);
        event
    }
}

/// A notification created `minutes_ago` minutes in the past.
pub fn notification(id: &str, kind: NotificationKind, minutes_ago: i64) -> Notification {
    Notification {
        id: NotificationId::new(id),
        kind,
        title: format!("Notification {id}"),
        message: "test".to_string(),
        trip: Some(TripRef {
            id: TripId::new("trip-1"),
            title: "Coastal ride".to_string(),
            location: Some("Lisbon".to_string()),
        }),
        requester: Some(RequesterRef {
            id: UserId::new("u1"),
            name: "Sam".to_string(),
            email: None,
            avatar: None,
        }),
        is_read: false,
        is_favorite: false,
        action_taken: Default::default(),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

/// A chat message in the test trip room, created `secs_ago` seconds ago.
pub fn message(id: &str, body: &str, secs_ago: i64) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        trip_id: TripId::new(TRIP),
        author: MessageAuthor {
            id: UserId::new("u1"),
            name: "Sam".to_string(),
            avatar: None,
        },
        body: body.to_string(),
        message_type: MessageType::General,
        is_admin_reply: false,
        parent_message_id: None,
        created_at: Utc::now() - Duration::seconds(secs_ago),
    }
}
