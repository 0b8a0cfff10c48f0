//! In-memory session store for tests and single-node development.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_core::traits::SessionStore;

/// One stored session entry.
#[derive(Debug, Clone, Copy)]
struct Entry {
    user_id: i64,
    expires_at: Instant,
}

/// In-memory session store with per-entry expiry.
///
/// Expired entries are dropped lazily on access; `delete` never counts an
/// entry that had already expired, matching the Redis `DEL` semantics the
/// refresh flow relies on.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemorySessionStore {
    /// Create a new empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, session_id: &str, user_id: i64, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            return Err(AppError::validation("session TTL must be positive"));
        }

        self.entries.insert(
            session_id.to_string(),
            Entry {
                user_id,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, session_id: &str) -> AppResult<Option<i64>> {
        let now = Instant::now();
        let live = self
            .entries
            .get(session_id)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.user_id);

        if live.is_none() {
            // Drop an expired leftover, if any.
            self.entries
                .remove_if(session_id, |_, entry| entry.expires_at <= now);
        }
        Ok(live)
    }

    async fn delete(&self, session_id: &str) -> AppResult<u64> {
        let now = Instant::now();
        if self
            .entries
            .remove_if(session_id, |_, entry| entry.expires_at > now)
            .is_some()
        {
            return Ok(1);
        }
        // Absent, or present but expired: either way nothing live was removed.
        self.entries.remove(session_id);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemorySessionStore::new();
        store.put("sid-1", 42, Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get("sid-1").await.unwrap(), Some(42));
        assert_eq!(store.delete("sid-1").await.unwrap(), 1);
        assert_eq!(store.get("sid-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_absent_key_counts_zero() {
        let store = MemorySessionStore::new();
        assert_eq!(store.delete("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_second_delete_counts_zero() {
        let store = MemorySessionStore::new();
        store.put("sid-2", 7, Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.delete("sid-2").await.unwrap(), 1);
        assert_eq!(store.delete("sid-2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent() {
        let store = MemorySessionStore::new();
        store.put("sid-3", 9, Duration::from_nanos(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert_eq!(store.get("sid-3").await.unwrap(), None);
        assert_eq!(store.delete("sid-3").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let store = MemorySessionStore::new();
        let err = store.put("sid-4", 1, Duration::ZERO).await.unwrap_err();
        assert_eq!(err.kind, userhub_core::error::ErrorKind::Validation);
    }
}
