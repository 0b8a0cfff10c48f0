//! Session store trait for pluggable key→value backends with per-key TTL.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Contract over a key→value store holding live session records.
///
/// Keys are session identifiers (UUID strings), values are the owning user
/// identifiers. Entries expire on their own once the TTL elapses; presence
/// of a key is authoritative for "this session is still usable".
///
/// Per-key operations must be atomic: concurrent deletes of the same key
/// report the removal to exactly one caller. No retries happen in this
/// layer; transport failures surface as `Cache`-kind errors.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Store a session with the given time-to-live.
    ///
    /// A zero TTL is a programmer error and is rejected with a
    /// `Validation`-kind error rather than silently becoming "no expiry".
    async fn put(&self, session_id: &str, user_id: i64, ttl: Duration) -> AppResult<()>;

    /// Look up the owning user of a session. Absent or expired keys yield
    /// `None`, never an error.
    async fn get(&self, session_id: &str) -> AppResult<Option<i64>>;

    /// Delete a session, returning how many entries were removed.
    /// Deleting an absent key returns 0, not an error.
    async fn delete(&self, session_id: &str) -> AppResult<u64>;
}
