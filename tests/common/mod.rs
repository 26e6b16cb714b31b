#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use fleetchat::modules::session::crud::{KeyValueStore, MemoryStore, SessionCrud, StorageError};
use fleetchat::modules::session::manager::SessionManager;
use fleetchat::services::chat::{ChatBackend, ChatError, ChatReply, ChatRequest};

/// Answers from a queue of canned results and records every request.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ChatReply, ChatError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reply(&self, text: &str) {
        self.replies.lock().await.push_back(Ok(ChatReply {
            response: Some(text.to_string()),
        }));
    }

    pub async fn fail(&self, status: u16) {
        self.replies.lock().await.push_back(Err(ChatError::ApiError {
            status,
            message: "backend unavailable".to_string(),
        }));
    }

    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        self.requests.lock().await.push(request.clone());
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::InvalidResponse("no scripted reply".to_string())))
    }
}

/// Holds every request until `release` is notified.
#[derive(Default)]
pub struct GatedBackend {
    pub release: Notify,
}

#[async_trait]
impl ChatBackend for GatedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        self.release.notified().await;
        Ok(ChatReply {
            response: Some(format!("Echo: {}", request.message)),
        })
    }
}

/// Storage whose every call fails, like a full disk or a dropped redis link.
pub struct FailingStore;

fn storage_down() -> StorageError {
    StorageError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "storage unavailable",
    ))
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(storage_down())
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(storage_down())
    }

    async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(storage_down())
    }
}

pub fn memory_crud() -> SessionCrud {
    SessionCrud::new(Arc::new(MemoryStore::new()))
}

pub async fn manager_with(backend: Arc<dyn ChatBackend>) -> (SessionManager, SessionCrud) {
    let crud = memory_crud();
    let manager = SessionManager::load(crud.clone(), backend).await;
    (manager, crud)
}

/// Polls until the manager reports a send in flight.
pub async fn wait_for_processing(manager: &SessionManager) {
    for _ in 0..1000 {
        if manager.is_processing().await {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("send never started");
}
