use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RedisHelperError {
    #[error("redis error: {0}")]
    Redis(#[from] RedisError),
    #[error("redis json codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Thin pass-through over a shared `ConnectionManager`, for test fixtures
/// that poke at application caches.
pub struct RedisHelper {
    conn: ConnectionManager,
}

impl RedisHelper {
    pub async fn connect(dsn: &str) -> Result<Self, RedisError> {
        let client = redis::Client::open(dsn)?;
        let conn = client.get_connection_manager().await?;
        info!("redis connection manager ready");
        Ok(RedisHelper { conn })
    }

    pub fn from_manager(conn: ConnectionManager) -> Self {
        RedisHelper { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, RedisError> {
        let mut conn = self.conn.clone();
        conn.get(key).await
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), RedisError> {
        let mut conn = self.conn.clone();
        conn.set(key, value).await
    }

    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), RedisError> {
        let mut conn = self.conn.clone();
        conn.set_ex(key, value, ttl_secs).await
    }

    /// True when the key existed and was removed.
    pub async fn del(&self, key: &str) -> Result<bool, RedisError> {
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(key).await?;
        Ok(removed > 0)
    }

    pub async fn exists(&self, key: &str) -> Result<bool, RedisError> {
        let mut conn = self.conn.clone();
        conn.exists(key).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, RedisHelperError> {
        match self.get(key).await? {
            None => Ok(None),
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        }
    }

    pub async fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: Option<u64>,
    ) -> Result<(), RedisHelperError> {
        let text = serde_json::to_string(value)?;
        match ttl_secs {
            Some(ttl) => self.set_ex(key, &text, ttl).await?,
            None => self.set(key, &text).await?,
        }
        Ok(())
    }
}
