//! Core type definitions used across the TripHub workspace.

pub mod filter;
pub mod id;
pub mod response;

pub use filter::NotificationFilter;
pub use id::*;
pub use response::ApiEnvelope;
