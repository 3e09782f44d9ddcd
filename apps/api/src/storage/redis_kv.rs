use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::storage::{KvItem, KvStore, StorageError};

const SCAN_BATCH: usize = 100;

/// Key-value store backed by Redis. The multiplexed connection is shared by all callers.
#[derive(Clone)]
pub struct RedisKv {
    conn: MultiplexedConnection,
}

impl RedisKv {
    pub async fn connect(client: &redis::Client) -> Result<Self, StorageError> {
        let conn = client.get_multiplexed_async_connection().await?;
        info!("Redis connection established");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        debug!("Stored {key} ({} bytes)", value.len());
        Ok(())
    }

    async fn list(
        &self,
        pattern: &str,
        include_values: bool,
    ) -> Result<Vec<KvItem>, StorageError> {
        let mut conn = self.conn.clone();

        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may return a key more than once.
        keys.sort();
        keys.dedup();

        if !include_values {
            return Ok(keys
                .into_iter()
                .map(|key| KvItem { key, value: None })
                .collect());
        }

        let mut items = Vec::with_capacity(keys.len());
        for key in keys {
            // Keys removed between SCAN and GET are skipped.
            let value: Option<String> = conn.get(&key).await?;
            if let Some(value) = value {
                items.push(KvItem {
                    key,
                    value: Some(value),
                });
            }
        }
        Ok(items)
    }
}
