use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{MessageRole, ReplyKind};

/// A single chat turn in the clinical workspace.
///
/// Messages are append-only: once pushed to a conversation they are never
/// edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Whether an assistant message is a real answer or a displayed failure.
    /// `None` for user messages.
    pub reply_kind: Option<ReplyKind>,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: MessageRole::User,
            text: text.to_string(),
            timestamp: Utc::now(),
            reply_kind: None,
        }
    }

    pub fn assistant(text: String, kind: ReplyKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: MessageRole::Assistant,
            text,
            timestamp: Utc::now(),
            reply_kind: Some(kind),
        }
    }
}
