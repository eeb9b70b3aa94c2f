//! Admin notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use triphub_core::types::id::{NotificationId, TripId, UserId};

/// The kind of an admin notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A plain informational notification.
    Generic,
    /// A user asked to join a community trip.
    CommunityTripJoinRequest,
    /// A captain submitted a new community trip for approval.
    CommunityTripCreationRequest,
}

/// Which backend operation resolves an approve/reject action.
///
/// Extension point: an actionable kind added server-side gets a new
/// variant here and one match arm in [`NotificationKind::approval_route`];
/// nothing else in the client changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalRoute {
    /// Resolve against the community-trip moderation endpoints.
    TripModeration,
    /// Resolve against the generic notification approval endpoints.
    Notification,
}

impl NotificationKind {
    /// The approval route for this kind, or `None` if it is not actionable.
    pub fn approval_route(&self) -> Option<ApprovalRoute> {
        match self {
            Self::Generic => None,
            Self::CommunityTripJoinRequest => Some(ApprovalRoute::Notification),
            Self::CommunityTripCreationRequest => Some(ApprovalRoute::TripModeration),
        }
    }

    /// Whether an admin can approve or reject this kind.
    pub fn is_actionable(&self) -> bool {
        self.approval_route().is_some()
    }
}

/// Terminal moderation state of an actionable notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    /// No action yet.
    #[default]
    None,
    /// The request was approved.
    Approved,
    /// The request was rejected.
    Rejected,
}

impl ActionTaken {
    /// Whether a moderation decision has been recorded.
    ///
    /// Once terminal, the decision never changes and the approve/reject
    /// controls are hidden.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The community trip a notification refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRef {
    /// Trip identifier.
    pub id: TripId,
    /// Trip title.
    pub title: String,
    /// Trip location.
    pub location: Option<String>,
}

/// The user whose request produced a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterRef {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub avatar: Option<String>,
}

/// An admin notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Server-assigned stable identifier, unique within the list.
    pub id: NotificationId,
    /// Notification kind.
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
    /// Display title.
    pub title: String,
    /// Display body.
    pub message: String,
    /// The trip this notification refers to, if any.
    #[serde(default)]
    pub trip: Option<TripRef>,
    /// The requesting user, if any.
    #[serde(default)]
    pub requester: Option<RequesterRef>,
    /// Read flag. Transitions false→true only.
    #[serde(default)]
    pub is_read: bool,
    /// Favorite flag, freely toggled (server-authoritative).
    #[serde(default)]
    pub is_favorite: bool,
    /// Moderation decision; set at most once.
    #[serde(default)]
    pub action_taken: ActionTaken,
    /// Creation time, used for recency ordering and display.
    pub created_at: DateTime<Utc>,
}

fn default_kind() -> NotificationKind {
    NotificationKind::Generic
}

impl Notification {
    /// Mark the notification read. Monotone: never reverts to unread.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }

    /// Record a moderation decision.
    ///
    /// Returns `false` without mutating if a decision was already taken
    /// or the notification kind is not actionable.
    pub fn resolve(&mut self, action: ActionTaken) -> bool {
        if self.action_taken.is_terminal() || !self.kind.is_actionable() {
            return false;
        }
        self.action_taken = action;
        self.is_read = true;
        true
    }
}
