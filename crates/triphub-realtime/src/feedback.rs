//! User-visible feedback stream.
//!
//! Services never render anything themselves; they publish [`UiEvent`]s
//! and the view layer turns them into toasts. Failures are reported here
//! after the canonical state was left untouched.

use tokio::sync::mpsc;
use tracing::warn;

/// Something the view layer should show the admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A failed operation, with the operation name for context.
    Error {
        /// What was being attempted, e.g. `"mark notification read"`.
        context: String,
        /// Human-readable description.
        message: String,
    },
}

/// Cloneable sending half of the feedback stream.
#[derive(Debug, Clone)]
pub struct FeedbackSender {
    tx: mpsc::Sender<UiEvent>,
}

impl FeedbackSender {
    /// Publishes a failure. Non-blocking; if the view is hopelessly
    /// behind, the event is dropped with a log line instead of stalling a
    /// state-machine handler.
    pub fn error(&self, context: impl Into<String>, message: impl Into<String>) {
        let event = UiEvent::Error {
            context: context.into(),
            message: message.into(),
        };
        if let Err(e) = self.tx.try_send(event) {
            warn!(error = %e, "Feedback channel full, toast dropped");
        }
    }
}

/// Creates the feedback stream.
pub fn feedback_channel(buffer: usize) -> (FeedbackSender, mpsc::Receiver<UiEvent>) {
    let (tx, rx) = mpsc::channel(buffer);
    (FeedbackSender { tx }, rx)
}
