use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    /// Append-only while `streaming` is set.
    pub text: String,
    #[serde(skip)]
    pub streaming: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>, streaming: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            streaming,
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text, false)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text, false)
    }

    /// Empty model message that fragments will be appended to.
    pub fn placeholder() -> Self {
        Self::new(ChatRole::Model, String::new(), true)
    }
}
