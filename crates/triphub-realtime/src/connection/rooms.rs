//! Room membership bookkeeping.

use triphub_core::types::id::TripId;

use crate::message::types::ClientMessage;

/// Which broadcast rooms the connection should be a member of.
///
/// The admin room is joined on every open. At most one trip room is
/// active at a time: joining a new one replaces the previous membership,
/// since the chat view navigated away from it.
#[derive(Debug, Clone, Default)]
pub struct RoomMembership {
    /// Whether the admin room join has been requested for this session.
    admin: bool,
    /// The currently active trip room, if any.
    trip: Option<TripId>,
}

impl RoomMembership {
    /// Record the admin-room membership.
    pub fn join_admin(&mut self) {
        self.admin = true;
    }

    /// Record a trip-room membership, replacing any previous trip room.
    ///
    /// Returns the trip room that was replaced, if the membership changed.
    pub fn join_trip(&mut self, trip_id: TripId) -> Option<TripId> {
        match &self.trip {
            Some(current) if *current == trip_id => None,
            _ => self.trip.replace(trip_id),
        }
    }

    /// The currently active trip room.
    pub fn active_trip(&self) -> Option<&TripId> {
        self.trip.as_ref()
    }

    /// The join frames to (re)send after the transport (re)opens.
    ///
    /// The admin room always comes first so admin-wide events resume
    /// before trip chatter.
    pub fn join_frames(&self) -> Vec<ClientMessage> {
        let mut frames = Vec::with_capacity(2);
        if self.admin {
            frames.push(ClientMessage::JoinAdminRoom);
        }
        if let Some(trip_id) = &self.trip {
            frames.push(ClientMessage::JoinTrip {
                trip_id: trip_id.clone(),
            });
        }
        frames
    }
}
