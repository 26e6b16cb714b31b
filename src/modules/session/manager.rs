use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::modules::session::crud::SessionCrud;
use crate::modules::session::model::{ChatSession, Message, EMPTY_REPLY};
use crate::modules::session::store::{SendRejection, SessionSnapshot, SessionStore};
use crate::services::chat::{ChatBackend, ChatRequest};

#[derive(Debug, Clone)]
pub enum SendOutcome {
    Sent {
        session_id: String,
        message: Message,
        reply: Message,
    },
    Rejected(SendRejection),
}

/// Shared handle over the session store.
///
/// Every mutation is persisted before the lock is released. `send` holds the
/// lock only around its two store updates, never across the chat request.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<Mutex<SessionStore>>,
    crud: SessionCrud,
    backend: Arc<dyn ChatBackend>,
}

impl SessionManager {
    pub async fn load(crud: SessionCrud, backend: Arc<dyn ChatBackend>) -> Self {
        let snapshot = crud.load().await;
        info!(
            sessions = snapshot.sessions.len(),
            active = ?snapshot.active_session_id,
            "Loaded chat sessions"
        );

        Self {
            store: Arc::new(Mutex::new(SessionStore::from_snapshot(snapshot))),
            crud,
            backend,
        }
    }

    async fn persist(&self, store: &MutexGuard<'_, SessionStore>) {
        if let Err(e) = self.crud.save(&store.snapshot()).await {
            error!(error = %e, "Failed to persist chat sessions");
        }
    }

    async fn mutate<R>(&self, f: impl FnOnce(&mut SessionStore) -> R) -> R {
        let mut store = self.store.lock().await;
        let result = f(&mut store);
        self.persist(&store).await;
        result
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.store.lock().await.snapshot()
    }

    pub async fn session(&self, id: &str) -> Option<ChatSession> {
        self.store.lock().await.session(id).cloned()
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.store.lock().await.active_session_id().map(str::to_string)
    }

    pub async fn is_processing(&self) -> bool {
        self.store.lock().await.is_processing()
    }

    pub async fn create(&self) -> ChatSession {
        let session = self.mutate(|store| store.create().clone()).await;
        debug!(session_id = %session.id, "Created chat session");
        session
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.mutate(|store| store.delete(id)).await
    }

    pub async fn rename(&self, id: &str, title: String) -> bool {
        self.mutate(|store| store.rename(id, title)).await
    }

    pub async fn select(&self, id: &str) -> bool {
        self.mutate(|store| store.select(id)).await
    }

    pub async fn clear(&self) {
        self.mutate(SessionStore::clear).await
    }

    pub async fn append_message(&self, id: &str, message: Message) -> bool {
        self.mutate(|store| store.append_message(id, message)).await
    }

    /// Sends `text` in the active session and records the reply.
    ///
    /// Backend failures are turned into an alert message in the session and
    /// never returned as errors.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let pending = {
            let mut store = self.store.lock().await;
            match store.begin_send(text) {
                Ok(pending) => {
                    self.persist(&store).await;
                    pending
                }
                Err(rejection) => {
                    debug!(reason = ?rejection, "Send rejected");
                    return SendOutcome::Rejected(rejection);
                }
            }
        };

        let request = ChatRequest {
            message: pending.user_message.content.clone(),
            history: pending.history.clone(),
        };

        let reply = match self.backend.complete(&request).await {
            Ok(reply) => {
                Message::assistant(reply.response.unwrap_or_else(|| EMPTY_REPLY.to_string()))
            }
            Err(e) => {
                warn!(session_id = %pending.session_id, error = %e, "Chat request failed");
                Message::connection_failure()
            }
        };

        let delivered = self
            .mutate(|store| store.finish_send(&pending, reply.clone()))
            .await;
        if !delivered {
            debug!(session_id = %pending.session_id, "Session deleted before reply arrived");
        }

        SendOutcome::Sent {
            session_id: pending.session_id,
            message: pending.user_message,
            reply,
        }
    }
}
