//! Key-value store: Redis-backed persistence for submission records.
//!
//! Values are opaque text blobs to this layer; serialization is the caller's
//! concern. Listing is a straight prefix scan with no pagination.

use async_trait::async_trait;
use redis::AsyncCommands;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key-value operation failed: {0}")]
    Backend(#[from] redis::RedisError),
}

/// One entry returned by a prefix listing. `value` is populated only when the
/// listing was asked to include values.
#[derive(Debug, Clone)]
pub struct KvItem {
    pub key: String,
    pub value: Option<String>,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// Writes `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Reads the value under `key`, or `None` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Returns every key starting with `prefix`, optionally with values.
    async fn list(&self, prefix: &str, include_values: bool) -> Result<Vec<KvItem>, KvError>;
}

pub struct RedisKv {
    client: redis::Client,
}

impl RedisKv {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    async fn list(&self, prefix: &str, include_values: bool) -> Result<Vec<KvItem>, KvError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pattern = format!("{prefix}*");

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter: redis::AsyncIter<'_, String> = conn.scan_match(&pattern).await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if !include_values {
            return Ok(keys.into_iter().map(|key| KvItem { key, value: None }).collect());
        }
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        // MGET returns values in argument order, so zipping is positional.
        let values: Vec<Option<String>> =
            redis::cmd("MGET").arg(&keys).query_async(&mut conn).await?;
        Ok(keys
            .into_iter()
            .zip(values)
            .map(|(key, value)| KvItem { key, value })
            .collect())
    }
}
