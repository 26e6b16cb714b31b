use std::sync::Arc;
use tracing::info;

use crate::config::{redis, settings::StorageBackend};
use crate::modules::session::crud::{
    FileStore, KeyValueStore, MemoryStore, RedisStore, StorageError,
};

/// Opens the key-value store selected by configuration.
pub async fn connect(backend: &StorageBackend) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    match backend {
        StorageBackend::Memory => {
            info!("Using in-memory chat storage; sessions are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::File { dir } => {
            let store = FileStore::open(dir.clone())?;
            info!(dir = %store.dir().display(), "Using file chat storage");
            Ok(Arc::new(store))
        }
        StorageBackend::Redis { uri, namespace } => {
            let manager = redis::connect(uri).await?;
            info!(namespace = %namespace, "Using redis chat storage");
            Ok(Arc::new(RedisStore::new(manager, namespace.clone())))
        }
    }
}
