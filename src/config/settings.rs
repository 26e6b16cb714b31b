use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_CHAT_API_URL: &str = "http://localhost:8000";
const DEFAULT_CHAT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_STORAGE_DIR: &str = ".fleetchat";
const DEFAULT_REDIS_NAMESPACE: &str = "fleetchat";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File { dir: PathBuf },
    Redis { uri: String, namespace: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub chat_api_url: String,
    /// `None` leaves the chat request without a deadline.
    pub chat_timeout: Option<Duration>,
    pub storage: StorageBackend,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let chat_api_url =
            lookup("CHAT_API_URL").unwrap_or_else(|| DEFAULT_CHAT_API_URL.to_string());

        let timeout_secs = match lookup("CHAT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                name: "CHAT_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_CHAT_TIMEOUT_SECS,
        };
        let chat_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "file".to_string());
        let storage = match backend.to_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File {
                dir: lookup("STORAGE_DIR")
                    .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())
                    .into(),
            },
            "redis" => StorageBackend::Redis {
                uri: lookup("REDIS_URI").ok_or(ConfigError::Missing("REDIS_URI"))?,
                namespace: lookup("REDIS_NAMESPACE")
                    .unwrap_or_else(|| DEFAULT_REDIS_NAMESPACE.to_string()),
            },
            _ => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: backend,
                })
            }
        };

        Ok(Self {
            bind_addr,
            chat_api_url,
            chat_timeout,
            storage,
        })
    }
}
