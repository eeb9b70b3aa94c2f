//! Derived question/answer threading.
//!
//! Computed on demand from the canonical flat transcript, never stored,
//! so it cannot drift from the transcript.

use triphub_entity::ChatMessage;

/// A question with its replies, in transcript order.
#[derive(Debug, Clone)]
pub struct QuestionThread {
    /// The top-level question (no parent).
    pub question: ChatMessage,
    /// Replies whose `parent_message_id` is the question's id. Depth is
    /// two by construction: a reply is never itself a parent.
    pub replies: Vec<ChatMessage>,
}

/// Groups the transcript's questions with their replies.
///
/// Non-question messages without a parent (general chatter,
/// announcements) are not part of any thread; the flat transcript view
/// renders those.
pub fn question_threads(messages: &[ChatMessage]) -> Vec<QuestionThread> {
    messages
        .iter()
        .filter(|m| m.is_question())
        .map(|question| QuestionThread {
            question: question.clone(),
            replies: messages
                .iter()
                .filter(|m| m.is_reply_to(&question.id))
                .cloned()
                .collect(),
        })
        .collect()
}
