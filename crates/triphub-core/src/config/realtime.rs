//! Realtime connection configuration.

use serde::{Deserialize, Serialize};

/// Realtime (WebSocket) connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket URL of the realtime endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    /// Buffer size of the typed inbound event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
    /// Initial reconnect backoff in milliseconds.
    #[serde(default = "default_backoff_initial")]
    pub reconnect_backoff_initial_ms: u64,
    /// Maximum reconnect backoff in milliseconds.
    #[serde(default = "default_backoff_max")]
    pub reconnect_backoff_max_ms: u64,
    /// Window after a send during which a server error rolls the send back,
    /// in milliseconds.
    #[serde(default = "default_send_error_window")]
    pub send_error_window_ms: u64,
    /// Dwell time before a visible notification list is auto-marked read,
    /// in milliseconds.
    #[serde(default = "default_dwell")]
    pub auto_read_dwell_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            event_buffer_size: default_event_buffer(),
            reconnect_backoff_initial_ms: default_backoff_initial(),
            reconnect_backoff_max_ms: default_backoff_max(),
            send_error_window_ms: default_send_error_window(),
            auto_read_dwell_ms: default_dwell(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:4000/ws".to_string()
}

fn default_event_buffer() -> usize {
    256
}

fn default_backoff_initial() -> u64 {
    500
}

fn default_backoff_max() -> u64 {
    30_000
}

fn default_send_error_window() -> u64 {
    4_000
}

fn default_dwell() -> u64 {
    2_000
}
