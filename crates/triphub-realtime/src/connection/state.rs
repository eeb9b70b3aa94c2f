//! Connection lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of the one realtime connection a session owns.
///
/// Transitions:
/// - Disconnected → Connecting on `connect()` with a credential
/// - Connecting → Connected on transport open (triggers room join)
/// - Connected → Reconnecting on transport drop
/// - Reconnecting → Connected on transport reopen (triggers room re-join)
/// - any state → Disconnected on explicit `disconnect()` or credential
///   rejection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No connection and none being attempted.
    #[default]
    Disconnected,
    /// First connect in progress.
    Connecting,
    /// Live and authenticated; rooms are joined.
    Connected,
    /// Dropped; the transport is retrying on its own.
    Reconnecting,
}

impl ConnectionState {
    /// Whether the connection is currently usable for sends.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether a connection attempt is alive in some form.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Reconnecting => write!(f, "reconnecting"),
        }
    }
}
