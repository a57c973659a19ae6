use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::Client;
use tokio::sync::Mutex;

use crate::db::CacheKey;
use crate::error::{AppError, AppResult};
use crate::services::recency::{RecencyPolicy, RecencyRecord, RecencyStore};

/// Recency record persisted in Redis as a single JSON value
///
/// The key expires one window after the last write, so an idle user's record
/// disappears on its own.
pub struct RedisRecencyStore {
    redis_client: Client,
    key: CacheKey,
    policy: RecencyPolicy,
    // Serializes read-modify-write cycles issued from this process
    write_lock: Mutex<()>,
}

impl RedisRecencyStore {
    pub fn new(redis_client: Client, namespace: impl Into<String>, policy: RecencyPolicy) -> Self {
        Self {
            redis_client,
            key: CacheKey::Recency(namespace.into()),
            policy,
            write_lock: Mutex::new(()),
        }
    }

    fn ttl_secs(&self) -> u64 {
        self.policy.window.num_seconds().max(1) as u64
    }

    async fn read(&self, conn: &mut redis::aio::MultiplexedConnection) -> AppResult<RecencyRecord> {
        let stored: Option<String> = conn.get(self.key.to_string()).await?;
        match stored {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                AppError::Internal(format!("Recency record deserialization error: {}", e))
            }),
            None => Ok(RecencyRecord::new()),
        }
    }

    async fn write(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        record: &RecencyRecord,
    ) -> AppResult<()> {
        let json = serde_json::to_string(record).map_err(|e| {
            AppError::Internal(format!("Recency record serialization error: {}", e))
        })?;
        let _: () = conn.set_ex(self.key.to_string(), json, self.ttl_secs()).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecencyStore for RedisRecencyStore {
    async fn load(&self) -> AppResult<RecencyRecord> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let mut record = self.read(&mut conn).await?;
        record.prune(Utc::now(), self.policy);
        Ok(record)
    }

    async fn record(&self, item_ids: &[String], at: DateTime<Utc>) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let mut record = self.read(&mut conn).await?;
        record.record_all(item_ids, at, self.policy);
        self.write(&mut conn, &record).await?;

        tracing::debug!(key = %self.key, remembered = record.len(), "Recorded suggested items");
        Ok(())
    }

    async fn prune(&self, now: DateTime<Utc>) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let mut record = self.read(&mut conn).await?;
        record.prune(now, self.policy);
        self.write(&mut conn, &record).await
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
