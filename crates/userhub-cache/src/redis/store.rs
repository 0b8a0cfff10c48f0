//! Redis session store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use userhub_core::error::{AppError, ErrorKind};
use userhub_core::result::AppResult;
use userhub_core::traits::SessionStore;

use super::client::RedisClient;

/// Redis-backed session store.
///
/// Relies on Redis's per-key atomicity: `DEL` reports the removal count,
/// which lets concurrent refresh attempts on the same session race safely
/// with exactly one winner.
#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisSessionStore {
    /// Create a new Redis session store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, session_id: &str, user_id: i64, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            return Err(AppError::validation("session TTL must be positive"));
        }

        let full_key = self.client.prefixed_key(session_id);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&full_key, user_id, ttl.as_secs().max(1))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<i64>> {
        let full_key = self.client.prefixed_key(session_id);
        let mut conn = self.client.conn_mut();
        let result: Option<i64> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn delete(&self, session_id: &str) -> AppResult<u64> {
        let full_key = self.client.prefixed_key(session_id);
        let mut conn = self.client.conn_mut();
        let removed: u64 = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(removed)
    }
}
