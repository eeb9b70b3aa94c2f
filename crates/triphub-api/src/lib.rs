//! HTTP implementations of the realtime crate's gateway seams.
//!
//! Thin bearer-authenticated REST client plus the notification and chat
//! gateway implementations over it.

pub mod chat;
pub mod client;
pub mod notifications;

pub use chat::HttpChatGateway;
pub use client::ApiClient;
pub use notifications::HttpNotificationGateway;
