use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::modules::session::model::ChatSession;
use crate::modules::session::store::SessionSnapshot;

pub const SESSIONS_KEY: &str = "chatbot_sessions";
pub const ACTIVE_SESSION_KEY: &str = "chatbot_active_session";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to replace stored value: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Minimal string key-value surface backing the chat state.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// One file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let dir = self.dir.clone();
        let target = self.path(key);
        let value = value.to_string();

        // Write beside the target, then rename over it.
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut file = NamedTempFile::new_in(&dir)?;
            file.write_all(value.as_bytes())?;
            file.as_file().sync_all()?;
            file.persist(target)?;
            Ok(())
        })
        .await?
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keys live under `{namespace}:{key}` on the redis server.
pub struct RedisStore {
    redis: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    pub fn new(redis: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            redis,
            namespace: namespace.into(),
        }
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut redis = self.redis.clone();
        let value: Option<String> = redis.get(self.key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut redis = self.redis.clone();
        let _: () = redis.set(self.key(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut redis = self.redis.clone();
        let _: () = redis.del(self.key(key)).await?;
        Ok(())
    }
}

/// Reads and writes the session collection and active session id.
#[derive(Clone)]
pub struct SessionCrud {
    store: Arc<dyn KeyValueStore>,
}

impl SessionCrud {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Never fails: anything unreadable comes back as an empty snapshot.
    pub async fn load(&self) -> SessionSnapshot {
        let sessions = match self.store.get(SESSIONS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatSession>>(&raw) {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!(error = %e, "Discarding corrupt chat sessions");
                    return SessionSnapshot::default();
                }
            },
            Ok(None) => return SessionSnapshot::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read chat sessions");
                return SessionSnapshot::default();
            }
        };

        let active_session_id = match self.store.get(ACTIVE_SESSION_KEY).await {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read active chat session");
                None
            }
        };

        SessionSnapshot {
            sessions,
            active_session_id,
        }
    }

    pub async fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string(&snapshot.sessions)?;
        self.store.set(SESSIONS_KEY, &json).await?;

        match &snapshot.active_session_id {
            Some(id) => self.store.set(ACTIVE_SESSION_KEY, id).await?,
            None => self.store.remove(ACTIVE_SESSION_KEY).await?,
        }

        Ok(())
    }
}
