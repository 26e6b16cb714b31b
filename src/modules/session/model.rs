use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::modules::session::classify::classify;

pub const DEFAULT_TITLE: &str = "New Chat";
pub const CONNECTION_FAILURE: &str =
    "❌ Error: Unable to connect to chat service. Please check if the backend is running.";
pub const EMPTY_REPLY: &str = "No response received";

const TITLE_MAX_CHARS: usize = 50;

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Default,
    Success,
    Alert,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Default => "default",
            MessageType::Success => "success",
            MessageType::Alert => "alert",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
}

impl Message {
    pub fn new(role: Role, content: String, kind: MessageType) -> Self {
        Self {
            id: generate_id(),
            role,
            content,
            created_at: Utc::now(),
            kind,
        }
    }

    pub fn user(content: String) -> Self {
        Self::new(Role::User, content, MessageType::Default)
    }

    /// Assistant reply styled by [`classify`].
    pub fn assistant(content: String) -> Self {
        let kind = classify(&content);
        Self::new(Role::Assistant, content, kind)
    }

    /// Synthetic reply used when the chat backend could not be reached.
    pub fn connection_failure() -> Self {
        Self::new(
            Role::Assistant,
            CONNECTION_FAILURE.to_string(),
            MessageType::Alert,
        )
    }

    /// `hh:mm AM` in the host's local time zone.
    pub fn time_label(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%I:%M %p")
            .to_string()
    }
}

/// One prior turn as sent to the chat backend.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(m: &Message) -> Self {
        Self {
            role: m.role,
            content: m.content.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends a message; the first one also names the session.
    pub fn push(&mut self, message: Message) {
        if self.messages.is_empty() {
            self.title = derive_title(&message.content);
        }
        self.messages.push(message);
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.messages.iter().map(HistoryEntry::from).collect()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
