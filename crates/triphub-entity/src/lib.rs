//! # triphub-entity
//!
//! Domain entity models for the TripHub admin client: notifications and
//! community-trip chat messages, serialized camelCase to match the
//! backend's JSON wire format.

pub mod message;
pub mod notification;

pub use message::{ChatMessage, MessageAuthor, MessageType};
pub use notification::{
    ActionTaken, ApprovalRoute, Notification, NotificationKind, RequesterRef, TripRef,
};
