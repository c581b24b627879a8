use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    #[default]
    Human,
    Ai,
    System,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Ai => write!(f, "ai"),
            Self::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "ai" => Ok(Self::Ai),
            "system" => Ok(Self::System),
            _ => Err(format!("Unknown chat role: {s}")),
        }
    }
}

/// A chat session. Owned by the external conversation subsystem; this
/// service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSession {
    /// Session key correlating the session with its message items.
    pub chat_id: String,
    pub app_id: String,
    pub user_id: String,
    pub title: String,
    pub source: String,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a chat session. Joined to its session by
/// `chat_id` value equality, not a strict foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessageItem {
    pub id: String,
    pub chat_id: String,
    pub role: ChatRole,
    pub content: String,
    /// Feedback flag set by the end user. `None` means no feedback given;
    /// only an explicit `Some(true)` counts toward `feedback_count`.
    pub user_feedback: Option<bool>,
    /// Feedback flag set by a human operator. Same presence semantics.
    pub admin_feedback: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageItem {
    pub fn has_user_feedback(&self) -> bool {
        self.user_feedback == Some(true)
    }

    pub fn has_admin_feedback(&self) -> bool {
        self.admin_feedback == Some(true)
    }
}

/// Parameters for a ranked chat-log page query, after handler validation.
#[derive(Debug, Clone)]
pub struct ChatLogRequest {
    pub app_id: String,
    /// Caller identity resolved by the auth layer, never client-supplied.
    pub user_id: String,
    pub page_num: u32,
    pub page_size: u32,
}

/// One row of the ranked chat-log listing. The three counts are derived per
/// query from the joined message items, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatLogRow {
    /// Session key.
    pub id: String,
    pub title: String,
    pub source: String,
    /// Last-update timestamp of the session.
    pub time: DateTime<Utc>,
    pub message_count: u32,
    /// Joined messages with user feedback present and true.
    pub feedback_count: u32,
    /// Joined messages with operator feedback present and true.
    pub mark_count: u32,
}

/// A page of ranked chat logs plus the unsliced total for pagination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatLogPage {
    pub page_num: u32,
    pub page_size: u32,
    pub data: Vec<ChatLogRow>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(user: Option<bool>, admin: Option<bool>) -> ChatMessageItem {
        ChatMessageItem {
            id: "m1".to_string(),
            chat_id: "c1".to_string(),
            role: ChatRole::Human,
            content: "hi".to_string(),
            user_feedback: user,
            admin_feedback: admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn feedback_presence_requires_explicit_true() {
        assert!(message(Some(true), None).has_user_feedback());
        assert!(!message(Some(false), None).has_user_feedback());
        assert!(!message(None, None).has_user_feedback());
        assert!(message(None, Some(true)).has_admin_feedback());
        assert!(!message(None, Some(false)).has_admin_feedback());
    }

    #[test]
    fn chat_role_round_trips() {
        for role in [ChatRole::Human, ChatRole::Ai, ChatRole::System] {
            let parsed: ChatRole = role.to_string().parse().expect("parse");
            assert_eq!(parsed, role);
        }
        assert!("robot".parse::<ChatRole>().is_err());
    }
}
