//! Client-side connection lifecycle: state machine, room membership,
//! and the manager that owns the transport.

pub mod manager;
pub mod rooms;
pub mod state;

pub use manager::ConnectionManager;
pub use rooms::RoomMembership;
pub use state::ConnectionState;
