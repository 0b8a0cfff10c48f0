//! Authentication flows — sign-up, sign-in, refresh, sign-out, validate.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use userhub_auth::password::PasswordHasher;
use userhub_auth::session::SessionManager;
use userhub_auth::token::{TokenIssuer, TokenPair, TokenVerifier};
use userhub_core::error::AppError;
use userhub_core::result::AppResult;
use userhub_core::traits::CredentialStore;

/// Drives the per-request authentication state machines.
///
/// Each flow is terminal on its first failure and never mutates state it
/// did not create itself; the validate path mutates nothing at all.
/// Requests may run concurrently without in-process locking: liveness
/// races are settled by the session store's atomic delete-count semantics.
#[derive(Clone)]
pub struct AuthService {
    /// Credential records (external store).
    credentials: Arc<dyn CredentialStore>,
    /// One-way credential hashing.
    hasher: PasswordHasher,
    /// Token pair minting.
    issuer: TokenIssuer,
    /// Token signature/expiry checking.
    verifier: TokenVerifier,
    /// Session persistence and revocation.
    sessions: SessionManager,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl AuthService {
    /// Creates the service from its injected collaborators.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
        sessions: SessionManager,
    ) -> Self {
        Self {
            credentials,
            hasher,
            issuer,
            verifier,
            sessions,
        }
    }

    /// Registers a new user and returns the generated user id.
    pub async fn sign_up(&self, username: &str, password: &str) -> AppResult<i64> {
        if self.credentials.exists(username).await? {
            return Err(AppError::conflict("such user exists"));
        }

        let password_hash = self.hasher.hash(password)?;
        let user_id = self.credentials.insert(username, &password_hash).await?;

        info!(user_id, username, "User registered");
        Ok(user_id)
    }

    /// Authenticates a user and opens a fresh session pair.
    pub async fn sign_in(&self, username: &str, password: &str) -> AppResult<TokenPair> {
        let credential = self
            .credentials
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::no_such_user("no such user"))?;

        if !self.hasher.verify(&credential.password_hash, password)? {
            warn!(username, "Sign-in rejected: password mismatch");
            return Err(AppError::bad_credentials("invalid username or password"));
        }

        let now = Utc::now();
        let pair = self.issuer.mint(credential.id, now)?;
        self.sessions.open(&pair, credential.id, now).await?;

        info!(user_id = credential.id, "User signed in");
        Ok(pair)
    }

    /// Rotates a refresh token into a brand-new session pair.
    ///
    /// The old refresh session is revoked before the new pair is minted;
    /// a token whose session was already gone (used, expired, or lost to
    /// a concurrent refresh) can never mint a successor.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.verifier.decode_refresh(refresh_token)?;

        let removed = self
            .sessions
            .revoke(&claims.session_id.to_string())
            .await?;
        if removed == 0 {
            return Err(AppError::invalid_token(
                "refresh session already revoked or expired",
            ));
        }

        let now = Utc::now();
        let pair = self.issuer.mint(claims.user_id, now)?;
        self.sessions.open(&pair, claims.user_id, now).await?;

        info!(user_id = claims.user_id, "Session pair rotated");
        Ok(pair)
    }

    /// Revokes the access session of a signed-in user.
    ///
    /// Access-only revocation: the paired refresh session stays bounded
    /// by its own TTL. An access session that is already gone is reported
    /// the same way as any other unusable token.
    pub async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let claims = self.verifier.decode_access(access_token)?;

        let removed = self
            .sessions
            .revoke(&claims.session_id.to_string())
            .await?;
        if removed == 0 {
            return Err(AppError::invalid_token(
                "access session already revoked or expired",
            ));
        }

        info!(user_id = claims.user_id, "User signed out");
        Ok(())
    }

    /// Validates an access token and returns the owning user id.
    ///
    /// Pure read path: checks the signature and expiry, then the session
    /// store's authoritative liveness record. Never mutates session state.
    pub async fn validate(&self, access_token: &str) -> AppResult<i64> {
        let claims = self.verifier.decode_access(access_token)?;

        if !self.sessions.is_live(&claims.session_id.to_string()).await {
            return Err(AppError::invalid_token("session no longer live"));
        }

        Ok(claims.user_id)
    }
}
