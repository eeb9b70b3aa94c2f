//! REST response envelope types.
//!
//! Every backend endpoint wraps its payload in `{status, data, ...}`.

use serde::{Deserialize, Serialize};

/// Standard success envelope returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// `"success"` on success; anything else is treated as a failure.
    pub status: String,
    /// The payload.
    pub data: T,
    /// Server-side unread counter, present on the notification list
    /// endpoint. Advisory only; the client recomputes its own count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<i64>,
}

impl<T> ApiEnvelope<T> {
    /// Whether the backend reported success.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_round_trip() {
        let json = r#"{"status":"success","data":[1,2],"unreadCount":2}"#;
        let env: ApiEnvelope<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(env.is_success());
        assert_eq!(env.data, vec![1, 2]);
        assert_eq!(env.unread_count, Some(2));
    }

    #[test]
    fn test_envelope_without_unread_count() {
        let json = r#"{"status":"error","data":null}"#;
        let env: ApiEnvelope<Option<i32>> = serde_json::from_str(json).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.unread_count, None);
    }
}
