//! Trip chat transcript state machine.
//!
//! One store per trip room. The transcript is the canonical flat list,
//! ordered by `created_at` ascending with unique ids; push events and
//! REST batches may arrive in any interleaving and converge to the same
//! transcript.

use triphub_core::types::id::{MessageId, TripId};
use triphub_entity::ChatMessage;

use crate::merge::merge_by_id;

/// The canonical ordered transcript of a single trip room.
#[derive(Debug)]
pub struct ChatStore {
    trip_id: TripId,
    messages: Vec<ChatMessage>,
}

impl ChatStore {
    /// Creates an empty transcript for one trip room.
    pub fn new(trip_id: TripId) -> Self {
        Self {
            trip_id,
            messages: Vec::new(),
        }
    }

    /// The trip room this transcript belongs to.
    pub fn trip_id(&self) -> &TripId {
        &self.trip_id
    }

    /// Merges a REST-fetched batch, de-duplicating by id and re-sorting
    /// by `created_at` ascending. Tolerates being called any number of
    /// times (e.g. on reconnect) without duplicates or disorder. Entries
    /// for other trips are dropped. Returns the number of entries added.
    pub fn merge_batch(&mut self, batch: Vec<ChatMessage>) -> usize {
        let scoped: Vec<ChatMessage> = batch
            .into_iter()
            .filter(|m| m.trip_id == self.trip_id)
            .collect();
        merge_by_id(
            &mut self.messages,
            scoped,
            |m| m.id.clone(),
            |m| m.created_at,
        )
    }

    /// Inserts a pushed message at its ordered position if its id is not
    /// already present. Guards against the server echoing a message a
    /// REST re-fetch already captured, and vice versa. Messages for other
    /// trips are ignored (the view already navigated away from them).
    pub fn apply_push(&mut self, message: ChatMessage) -> bool {
        if message.trip_id != self.trip_id || self.contains(&message.id) {
            return false;
        }
        let at = self
            .messages
            .partition_point(|m| m.created_at <= message.created_at);
        self.messages.insert(at, message);
        true
    }

    /// Replaces the entry matching the message's id in place (edits,
    /// moderation). A no-op if the id is unknown.
    pub fn apply_update(&mut self, message: ChatMessage) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message.id) {
            Some(slot) => {
                *slot = message;
                // An edit cannot move a message in time, but re-sorting
                // keeps the ordering invariant unconditional.
                self.messages.sort_by_key(|m| m.created_at);
                true
            }
            None => false,
        }
    }

    /// Whether an id is present.
    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    /// The transcript, oldest first, safe to render with ids as stable
    /// keys.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
