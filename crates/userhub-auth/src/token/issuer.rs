//! Token pair minting with per-class signing secrets and TTLs.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use userhub_core::config::auth::AuthConfig;
use userhub_core::error::AppError;

use super::claims::{AccessClaims, RefreshClaims};

/// A freshly minted, correlated access/refresh token pair.
///
/// Transient: returned to the caller and never stored server-side; only
/// the two session identifiers are persisted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived signed access token.
    pub access_token: String,
    /// Long-lived signed refresh token.
    pub refresh_token: String,
    /// Session identifier embedded in the access token.
    pub access_session_id: Uuid,
    /// Session identifier embedded in the refresh token.
    pub refresh_session_id: Uuid,
    /// Access token expiration instant.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration instant.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Mints signed access and refresh tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC key for access-token signing.
    access_key: EncodingKey,
    /// HMAC key for refresh-token signing.
    refresh_key: EncodingKey,
    /// Access token TTL.
    access_ttl: Duration,
    /// Refresh token TTL.
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: Duration::days(config.refresh_ttl_days as i64),
        }
    }

    /// Mints a correlated token pair for the given user.
    ///
    /// Generates two fresh v4 session identifiers and signs each claim set
    /// with its class-specific secret. Consumes randomness but has no
    /// other side effects; persistence is the session manager's job.
    pub fn mint(&self, user_id: i64, now: DateTime<Utc>) -> Result<TokenPair, AppError> {
        let access_session_id = Uuid::new_v4();
        let refresh_session_id = Uuid::new_v4();
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let access_claims = AccessClaims {
            authorized: true,
            session_id: access_session_id,
            user_id,
            exp: access_expires_at.timestamp(),
        };

        let refresh_claims = RefreshClaims {
            session_id: refresh_session_id,
            user_id,
            exp: refresh_expires_at.timestamp(),
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_key)
            .map_err(|e| AppError::internal(format!("Failed to encode refresh token: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_session_id,
            refresh_session_id,
            access_expires_at,
            refresh_expires_at,
        })
    }
}
