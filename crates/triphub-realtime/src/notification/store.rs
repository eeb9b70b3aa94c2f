//! Notification list state machine.
//!
//! A pure reducer over the canonical notification list: every mutation is
//! a synchronous method, every derived value is recomputed from the list.
//! Where the entries came from (REST seed, REST refresh, push) is
//! invisible here; the merge rules make the three sources converge.

use std::cmp::Reverse;

use triphub_core::types::filter::NotificationFilter;
use triphub_core::types::id::NotificationId;
use triphub_entity::{ActionTaken, Notification};

use crate::merge::merge_by_id;

/// The canonical, de-duplicated, recency-ordered notification list.
///
/// Ordering: newest first. Pushed notifications are prepended (the server
/// pushes in creation order); a full reseed re-sorts by `created_at`
/// descending.
#[derive(Debug, Default)]
pub struct NotificationStore {
    items: Vec<Notification>,
}

impl NotificationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges a REST batch into the list. On first load this is a plain
    /// replace; later calls de-duplicate by id, with the server copy
    /// winning. Returns the number of entries added.
    pub fn seed(&mut self, batch: Vec<Notification>) -> usize {
        merge_by_id(
            &mut self.items,
            batch,
            |n| n.id.clone(),
            |n| Reverse(n.created_at),
        )
    }

    /// Prepends a pushed notification if its id is not already present.
    /// Idempotent: a duplicate push is a no-op. Returns whether the list
    /// changed.
    pub fn apply_push(&mut self, notification: Notification) -> bool {
        if self.contains(&notification.id) {
            return false;
        }
        self.items.insert(0, notification);
        true
    }

    /// Marks one entry read. Monotone (never reverts) and a no-op for an
    /// unknown id. Returns whether the entry transitioned.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.items.iter_mut().find(|n| &n.id == id) {
            Some(n) if !n.is_read => {
                n.mark_read();
                true
            }
            _ => false,
        }
    }

    /// Marks every entry read. Returns how many transitioned.
    pub fn mark_all_read(&mut self) -> usize {
        let mut transitioned = 0;
        for n in &mut self.items {
            if !n.is_read {
                n.mark_read();
                transitioned += 1;
            }
        }
        transitioned
    }

    /// Sets the favorite flag to the server-confirmed value.
    pub fn set_favorite(&mut self, id: &NotificationId, is_favorite: bool) -> bool {
        match self.items.iter_mut().find(|n| &n.id == id) {
            Some(n) => {
                n.is_favorite = is_favorite;
                true
            }
            None => false,
        }
    }

    /// Records a terminal moderation decision (also marks the entry read).
    /// A no-op when the id is unknown, the kind is not actionable, or a
    /// decision was already taken.
    pub fn resolve(&mut self, id: &NotificationId, action: ActionTaken) -> bool {
        match self.items.iter_mut().find(|n| &n.id == id) {
            Some(n) => n.resolve(action),
            None => false,
        }
    }

    /// Looks an entry up by id.
    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| &n.id == id)
    }

    /// Whether an id is present.
    pub fn contains(&self, id: &NotificationId) -> bool {
        self.items.iter().any(|n| &n.id == id)
    }

    /// Recomputed count of unread entries.
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.is_read).count()
    }

    /// Recomputed count of favorited entries.
    pub fn favorite_count(&self) -> usize {
        self.items.iter().filter(|n| n.is_favorite).count()
    }

    /// The canonical list, newest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// A filtered view of the canonical list. Never mutates.
    pub fn filtered(&self, filter: NotificationFilter) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| filter.matches(n.is_read, n.is_favorite))
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
