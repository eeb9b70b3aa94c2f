//! Community-trip chat message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use triphub_core::types::id::{MessageId, TripId, UserId};

/// The semantic type of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// A traveller question, groupable with its answers.
    Question,
    /// An answer linked to a question via `parent_message_id`.
    Answer,
    /// Free-form chatter.
    General,
    /// An admin/captain announcement.
    Announcement,
}

/// The author of a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAuthor {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Avatar URL.
    pub avatar: Option<String>,
}

/// A single message in a community-trip room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Server-assigned stable identifier, unique within the transcript.
    pub id: MessageId,
    /// The room this message belongs to.
    pub trip_id: TripId,
    /// Who wrote it.
    pub author: MessageAuthor,
    /// Message text.
    pub body: String,
    /// Semantic type.
    pub message_type: MessageType,
    /// Whether this is an admin reply (rendered as an own-message).
    #[serde(default)]
    pub is_admin_reply: bool,
    /// For answers, the question this replies to. Never forms a chain:
    /// a message with a parent is itself never a parent.
    #[serde(default)]
    pub parent_message_id: Option<MessageId>,
    /// Creation time; the transcript's primary sort key.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Whether this message starts a question thread.
    pub fn is_question(&self) -> bool {
        self.message_type == MessageType::Question && self.parent_message_id.is_none()
    }

    /// Whether this message replies to the given question.
    pub fn is_reply_to(&self, question_id: &MessageId) -> bool {
        self.parent_message_id.as_ref() == Some(question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str, parent: Option<&str>, message_type: MessageType) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(id),
            trip_id: TripId::new("t1"),
            author: MessageAuthor {
                id: UserId::new("u1"),
                name: "Amina".to_string(),
                avatar: None,
            },
            body: "hello".to_string(),
            message_type,
            is_admin_reply: false,
            parent_message_id: parent.map(MessageId::new),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_question_detection() {
        assert!(sample("m1", None, MessageType::Question).is_question());
        // An answer carrying a parent is not a thread root even if mistyped.
        assert!(!sample("m2", Some("m1"), MessageType::Question).is_question());
        assert!(!sample("m3", None, MessageType::General).is_question());
    }

    #[test]
    fn test_reply_link() {
        let answer = sample("m2", Some("m1"), MessageType::Answer);
        assert!(answer.is_reply_to(&MessageId::new("m1")));
        assert!(!answer.is_reply_to(&MessageId::new("m9")));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = r#"{
            "id": "m1",
            "tripId": "t1",
            "author": {"id": "u1", "name": "Amina", "avatar": null},
            "body": "when do we leave?",
            "messageType": "question",
            "isAdminReply": false,
            "createdAt": "2026-02-10T08:30:00Z"
        }"#;
        let m: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(m.trip_id, TripId::new("t1"));
        assert!(m.is_question());
        assert_eq!(m.parent_message_id, None);
    }
}
