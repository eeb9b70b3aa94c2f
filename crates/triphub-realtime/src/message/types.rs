//! Outbound and inbound realtime message type definitions.
//!
//! Frames are JSON objects `{"event": ..., "data": ...}` with kebab-case
//! event names matching the backend's socket contract.

use serde::{Deserialize, Serialize};

use triphub_core::types::id::{NotificationId, TripId};
use triphub_entity::{ChatMessage, MessageType, Notification};

/// Messages emitted by the console to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join the process-wide admin notification broadcast room.
    JoinAdminRoom,
    /// Join one community trip's message broadcast room.
    JoinTrip {
        /// Trip room to join.
        #[serde(rename = "tripId")]
        trip_id: TripId,
    },
    /// Send a chat message into a trip room.
    SendMessage {
        /// Target trip room.
        #[serde(rename = "tripId")]
        trip_id: TripId,
        /// Message text.
        message: String,
        /// Semantic type of the message.
        #[serde(rename = "messageType")]
        message_type: MessageType,
    },
}

/// Events pushed by the server over the open connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A new admin notification.
    AdminNotification(Notification),
    /// A join request was approved (possibly from another device).
    JoinRequestApproved {
        /// The resolved notification.
        #[serde(rename = "notificationId")]
        notification_id: NotificationId,
    },
    /// A join request was rejected (possibly from another device).
    JoinRequestRejected {
        /// The resolved notification.
        #[serde(rename = "notificationId")]
        notification_id: NotificationId,
    },
    /// A new chat message in a joined trip room.
    NewMessage(ChatMessage),
    /// An edited/moderated chat message.
    MessageUpdated(ChatMessage),
    /// A server-reported error.
    Error {
        /// Machine-readable code, when the server provides one.
        #[serde(default)]
        code: Option<String>,
        /// Human-readable description.
        message: String,
    },
}

/// Server error codes that mean the credential was rejected.
const AUTH_ERROR_CODES: &[&str] = &["UNAUTHORIZED", "AUTH_EXPIRED", "INVALID_TOKEN"];

impl ServerEvent {
    /// Whether this event reports a rejected credential.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Error {
                code: Some(code), ..
            } => AUTH_ERROR_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}

/// Typed events the connection manager delivers to its consumer.
///
/// This is [`ServerEvent`] with transport-level concerns folded in: the
/// credential-rejection case is split out so views can distinguish "the
/// server is unhappy" from "you are logged out".
#[derive(Debug, Clone)]
pub enum RealtimeEvent {
    /// A new admin notification was pushed.
    NotificationPushed(Notification),
    /// A join request was resolved elsewhere; `approved` tells how.
    JoinRequestResolved {
        /// The resolved notification.
        notification_id: NotificationId,
        /// `true` for approved, `false` for rejected.
        approved: bool,
    },
    /// A chat message was pushed.
    MessagePushed(ChatMessage),
    /// A chat message was updated in place.
    MessageUpdated(ChatMessage),
    /// A generic server or transport error.
    Error {
        /// Machine-readable code, when known.
        code: Option<String>,
        /// Human-readable description.
        message: String,
    },
    /// The credential was rejected; the connection is now down.
    AuthRejected {
        /// Human-readable description from the server.
        message: String,
    },
}
