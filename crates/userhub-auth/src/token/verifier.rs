//! Token verification with per-class secrets.
//!
//! Every rejection surfaces as a single `InvalidToken` kind: callers can
//! never distinguish a bad signature from an expired token or a
//! wrong-class token. The detailed reason is kept in the internal message
//! for server-side logging only.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::de::DeserializeOwned;

use userhub_core::config::auth::AuthConfig;
use userhub_core::error::AppError;

use super::claims::{AccessClaims, RefreshClaims};

/// Validates signed tokens against the class-specific secrets.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC key for access-token verification.
    access_key: DecodingKey,
    /// HMAC key for refresh-token verification.
    refresh_key: DecodingKey,
    /// Validation configuration shared by both classes.
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature against the access secret, expiry, claim shape,
    /// and the `authorized` flag.
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        let claims: AccessClaims = self.decode(token, &self.access_key)?;

        if !claims.authorized {
            return Err(AppError::invalid_token("access token not authorized"));
        }

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    ///
    /// Checks signature against the refresh secret, expiry, and claim
    /// shape. An access token presented here is rejected by both its
    /// signature and its extra claim fields.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        self.decode(token, &self.refresh_key)
    }

    /// Internal decode against one of the two keys.
    fn decode<C: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Result<C, AppError> {
        let token_data = decode::<C>(token, key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::invalid_token("token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::invalid_token("invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::invalid_token("invalid token signature")
                }
                _ => AppError::invalid_token(format!("token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use userhub_core::error::ErrorKind;

    use super::*;
    use crate::token::TokenIssuer;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_days: 7,
        }
    }

    #[test]
    fn test_fresh_pair_decodes() {
        let config = test_config();
        let issuer = TokenIssuer::new(&config);
        let verifier = TokenVerifier::new(&config);
        let pair = issuer.mint(42, Utc::now()).unwrap();

        let access = verifier.decode_access(&pair.access_token).unwrap();
        assert_eq!(access.user_id, 42);
        assert_eq!(access.session_id, pair.access_session_id);
        assert!(access.authorized);

        let refresh = verifier.decode_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.user_id, 42);
        assert_eq!(refresh.session_id, pair.refresh_session_id);
    }

    #[test]
    fn test_wrong_class_is_rejected() {
        let config = test_config();
        let issuer = TokenIssuer::new(&config);
        let verifier = TokenVerifier::new(&config);
        let pair = issuer.mint(42, Utc::now()).unwrap();

        let err = verifier.decode_access(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);

        let err = verifier.decode_refresh(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = test_config();
        let issuer = TokenIssuer::new(&config);
        let verifier = TokenVerifier::new(&config);

        // Mint far enough in the past that both tokens are expired.
        let pair = issuer.mint(42, Utc::now() - Duration::days(30)).unwrap();

        assert_eq!(
            verifier.decode_access(&pair.access_token).unwrap_err().kind,
            ErrorKind::InvalidToken
        );
        assert_eq!(
            verifier
                .decode_refresh(&pair.refresh_token)
                .unwrap_err()
                .kind,
            ErrorKind::InvalidToken
        );
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let issuer = TokenIssuer::new(&AuthConfig {
            access_secret: "some-other-secret".to_string(),
            ..test_config()
        });
        let verifier = TokenVerifier::new(&test_config());
        let pair = issuer.mint(42, Utc::now()).unwrap();

        let err = verifier.decode_access(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let verifier = TokenVerifier::new(&test_config());
        let err = verifier.decode_access("not.a.token").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidToken);
    }
}
