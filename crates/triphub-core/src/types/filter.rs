//! View filters over the notification list.

use serde::{Deserialize, Serialize};

/// A read-only filter applied when rendering the notification list.
///
/// Filtering never mutates the canonical list; it only selects which
/// entries a view displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFilter {
    /// Every notification.
    #[default]
    All,
    /// Only unread notifications.
    Unread,
    /// Only favorited notifications.
    Favorites,
}

impl NotificationFilter {
    /// Whether an entry with the given flags passes this filter.
    pub fn matches(&self, is_read: bool, is_favorite: bool) -> bool {
        match self {
            Self::All => true,
            Self::Unread => !is_read,
            Self::Favorites => is_favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches() {
        assert!(NotificationFilter::All.matches(true, false));
        assert!(NotificationFilter::Unread.matches(false, false));
        assert!(!NotificationFilter::Unread.matches(true, false));
        assert!(NotificationFilter::Favorites.matches(true, true));
        assert!(!NotificationFilter::Favorites.matches(false, false));
    }
}
