//! Typed realtime wire messages and consumer-facing events.

pub mod types;

pub use types::{ClientMessage, RealtimeEvent, ServerEvent};
