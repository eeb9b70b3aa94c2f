//! # triphub-realtime
//!
//! Client-side realtime core for the TripHub admin console. Provides:
//!
//! - WebSocket connection management with bearer-token authentication
//!   and room membership resynchronization after reconnects
//! - The notification state machine (ordered, de-duplicated list with
//!   read/favorite/approve/reject sub-states and derived counts)
//! - The community-trip chat state machine (ordered transcript with
//!   optimistic send and rollback on server rejection)
//! - A pluggable transport seam so both state machines are testable
//!   without a network

pub mod chat;
pub mod connection;
pub mod feedback;
pub mod gateway;
pub mod merge;
pub mod message;
pub mod notification;
pub mod transport;

pub use chat::service::ChatService;
pub use chat::store::ChatStore;
pub use connection::manager::ConnectionManager;
pub use connection::state::ConnectionState;
pub use feedback::{feedback_channel, FeedbackSender, UiEvent};
pub use message::types::RealtimeEvent;
pub use notification::dwell::DwellTimer;
pub use notification::service::NotificationService;
pub use notification::store::NotificationStore;
