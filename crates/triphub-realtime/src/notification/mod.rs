//! Notification list state machine, its service wrapper, and the
//! auto-read dwell timer.

pub mod dwell;
pub mod service;
pub mod store;

pub use dwell::DwellTimer;
pub use service::NotificationService;
pub use store::NotificationStore;
