use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::storage::{SessionStorage, StorageError};

/// Session storage backed by Redis. Keys are namespaced per session and
/// expire with it.
#[derive(Clone)]
pub struct RedisStorage {
    client: redis::Client,
    session_id: String,
    ttl_seconds: u64,
}

impl RedisStorage {
    pub fn new(connection_string: &str, session_id: &str, ttl_seconds: u64) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self {
            client,
            session_id: session_id.to_string(),
            ttl_seconds,
        })
    }

    fn session_key(&self, key: &str) -> String {
        format!("session:{}:{}", self.session_id, key)
    }
}

#[async_trait]
impl SessionStorage for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(self.session_key(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = self.session_key(key);
        conn.set_ex::<_, _, ()>(&key, value, self.ttl_seconds).await?;
        debug!("Session value stored: {} ({} bytes)", key, value.len());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(self.session_key(key)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_namespaced_per_session() {
        let storage = RedisStorage::new("redis://127.0.0.1/", "abc", 60).unwrap();
        assert_eq!(storage.session_key("waypoint:trips"), "session:abc:waypoint:trips");
    }
}
