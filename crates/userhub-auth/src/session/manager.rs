//! Session lifecycle over the pluggable session store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_core::traits::SessionStore;

use crate::token::TokenPair;

/// Persists and revokes session identifiers with store-enforced TTLs.
///
/// Presence of a session identifier in the store is the single source of
/// truth for "this token is still usable"; an unexpired signature with no
/// matching entry is treated as revoked.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Session persistence backend.
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Creates a new session manager over the given store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Persists both sessions of a freshly minted token pair.
    ///
    /// Each entry gets TTL `expires_at - now` for its own token class.
    /// If the refresh entry cannot be written after the access entry was,
    /// the access entry is rolled back before the error propagates, so a
    /// pair is either fully open or not open at all.
    pub async fn open(&self, pair: &TokenPair, user_id: i64, now: DateTime<Utc>) -> AppResult<()> {
        let access_ttl = ttl_until(pair.access_expires_at, now)?;
        let refresh_ttl = ttl_until(pair.refresh_expires_at, now)?;

        let access_key = pair.access_session_id.to_string();
        self.store.put(&access_key, user_id, access_ttl).await?;

        if let Err(e) = self
            .store
            .put(&pair.refresh_session_id.to_string(), user_id, refresh_ttl)
            .await
        {
            // Best-effort rollback; a leftover entry still dies by its own TTL.
            if let Err(cleanup) = self.store.delete(&access_key).await {
                warn!(
                    session_id = %access_key,
                    error = %cleanup,
                    "Failed to roll back access session after partial open"
                );
            }
            return Err(e);
        }

        Ok(())
    }

    /// Answers whether a session identifier is still live.
    ///
    /// Fails closed: a store error is reported as "not live", never as
    /// authorized.
    pub async fn is_live(&self, session_id: &str) -> bool {
        match self.store.get(session_id).await {
            Ok(entry) => entry.is_some(),
            Err(e) => {
                warn!(session_id, error = %e, "Session store lookup failed; treating as not live");
                false
            }
        }
    }

    /// Revokes a session, returning how many entries were removed.
    pub async fn revoke(&self, session_id: &str) -> AppResult<u64> {
        self.store.delete(session_id).await
    }
}

/// TTL from `now` to `expires_at`; an expiry not in the future is a
/// programmer error.
fn ttl_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<std::time::Duration> {
    (expires_at - now)
        .to_std()
        .ok()
        .filter(|ttl| !ttl.is_zero())
        .ok_or_else(|| AppError::validation("session expiry must be in the future"))
}
