//! Claim structures carried inside signed tokens.
//!
//! Two fixed shapes, each signed with its own secret. Decoding rejects a
//! token whose claim set does not match the shape expected by the
//! operation being performed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload of an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessClaims {
    /// Always `true` on minted tokens; carried for wire compatibility.
    pub authorized: bool,
    /// Session identifier keyed in the session store.
    pub session_id: Uuid,
    /// Owning user identifier.
    pub user_id: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Claims payload of a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshClaims {
    /// Session identifier keyed in the session store.
    pub session_id: Uuid,
    /// Owning user identifier.
    pub user_id: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}
