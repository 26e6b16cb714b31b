use serde::{Deserialize, Serialize};

use crate::modules::session::model::{ChatSession, HistoryEntry, Message};

/// The durable part of the store: everything except the processing flag.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub sessions: Vec<ChatSession>,
    pub active_session_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    Busy,
    NoActiveSession,
    EmptyMessage,
}

impl SendRejection {
    pub fn describe(&self) -> &'static str {
        match self {
            SendRejection::Busy => "A message is already being processed",
            SendRejection::NoActiveSession => "No active session",
            SendRejection::EmptyMessage => "Message cannot be empty",
        }
    }
}

/// A send that has been accepted and is waiting on the chat backend.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub session_id: String,
    pub user_message: Message,
    pub history: Vec<HistoryEntry>,
}

/// In-memory chat session state. Sessions are kept newest first.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_session_id: Option<String>,
    processing: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted state. An active id that points at no
    /// session falls back to the first session.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let SessionSnapshot {
            sessions,
            active_session_id,
        } = snapshot;

        let active_session_id = match active_session_id {
            Some(id) if sessions.iter().any(|s| s.id == id) => Some(id),
            Some(_) => sessions.first().map(|s| s.id.clone()),
            None => None,
        };

        Self {
            sessions,
            active_session_id,
            processing: false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            sessions: self.sessions.clone(),
            active_session_id: self.active_session_id.clone(),
        }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    fn session_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_session_id
            .as_deref()
            .and_then(|id| self.session(id))
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn create(&mut self) -> &ChatSession {
        let session = ChatSession::new();
        self.active_session_id = Some(session.id.clone());
        self.sessions.insert(0, session);
        &self.sessions[0]
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            return false;
        };
        self.sessions.remove(index);

        if self.active_session_id.as_deref() == Some(id) {
            self.active_session_id = self.sessions.first().map(|s| s.id.clone());
        }
        true
    }

    pub fn rename(&mut self, id: &str, title: String) -> bool {
        match self.session_mut(id) {
            Some(session) => {
                session.title = title;
                true
            }
            None => false,
        }
    }

    pub fn select(&mut self, id: &str) -> bool {
        if self.session(id).is_none() {
            return false;
        }
        self.active_session_id = Some(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
        self.active_session_id = None;
    }

    pub fn append_message(&mut self, id: &str, message: Message) -> bool {
        match self.session_mut(id) {
            Some(session) => {
                session.push(message);
                true
            }
            None => false,
        }
    }

    /// First half of a send: validates, appends the user message and marks
    /// the store busy. History excludes the message just appended.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend, SendRejection> {
        if self.processing {
            return Err(SendRejection::Busy);
        }

        let session_id = self
            .active_session_id
            .clone()
            .ok_or(SendRejection::NoActiveSession)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(SendRejection::EmptyMessage);
        }

        let session = self
            .session_mut(&session_id)
            .ok_or(SendRejection::NoActiveSession)?;

        let history = session.history();
        let user_message = Message::user(text.to_string());
        session.push(user_message.clone());

        self.processing = true;

        Ok(PendingSend {
            session_id,
            user_message,
            history,
        })
    }

    /// Second half of a send. The reply is dropped if its session was
    /// deleted in the meantime; the busy flag is cleared either way.
    pub fn finish_send(&mut self, pending: &PendingSend, reply: Message) -> bool {
        self.processing = false;
        self.append_message(&pending.session_id, reply)
    }
}
