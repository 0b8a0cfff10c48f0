//! The credential record stored by the external credential store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A username/password-hash record.
///
/// Owned by the credential store; this core reads it during sign-in and
/// never mutates `password_hash` directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Credential {
    /// Primary key, also the `user_id` carried in token claims.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
