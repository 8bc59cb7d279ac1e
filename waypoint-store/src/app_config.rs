use serde::Deserialize;
use std::env;
use std::sync::Arc;

use crate::gateway::DEFAULT_CACHE_KEY;
use crate::redis_repo::RedisStorage;
use crate::storage::{MemoryStorage, SessionStorage, StorageError};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Where the trip backend lives.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    pub auth_token: Option<String>,
}

fn default_timeout() -> u64 { 10 }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    #[serde(default = "default_cache_key")]
    pub key: String,
    pub redis_url: Option<String>,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
}

fn default_cache_key() -> String { DEFAULT_CACHE_KEY.to_string() }
fn default_session_ttl() -> u64 { 30 * 60 }

impl CacheConfig {
    pub fn build_storage(&self, session_id: &str) -> Result<Arc<dyn SessionStorage>, StorageError> {
        match self.backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
            CacheBackend::Redis => {
                let url = self.redis_url.as_deref().ok_or_else(|| {
                    StorageError::Misconfigured("cache.redis_url is required for the redis backend".into())
                })?;
                let storage = RedisStorage::new(url, session_id, self.session_ttl_seconds)?;
                Ok(Arc::new(storage))
            }
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// Trip cards painted before yielding; the rest go to the next frame.
    #[serde(default = "default_first_batch")]
    pub first_batch_size: usize,
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_first_batch() -> usize { 6 }
fn default_language() -> String { "en".to_string() }

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            first_batch_size: default_first_batch(),
            default_language: default_language(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `WAYPOINT__CACHE__BACKEND=redis`
            .add_source(config::Environment::with_prefix("WAYPOINT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
