//! End-to-end flow tests for `AuthService` over in-memory stores.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use userhub_auth::password::PasswordHasher;
use userhub_auth::session::SessionManager;
use userhub_auth::token::{TokenIssuer, TokenVerifier};
use userhub_cache::MemorySessionStore;
use userhub_core::config::auth::AuthConfig;
use userhub_core::error::ErrorKind;
use userhub_core::result::AppResult;
use userhub_core::traits::{CredentialStore, SessionStore};
use userhub_core::types::Credential;
use userhub_service::AuthService;

/// In-memory credential store double.
#[derive(Debug, Default)]
struct MemoryCredentialStore {
    rows: Mutex<Vec<Credential>>,
    next_id: AtomicI64,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Credential>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.username == username)
            .cloned())
    }

    async fn exists(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.username == username))
    }

    async fn insert(&self, username: &str, password_hash: &str) -> AppResult<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        self.rows.lock().unwrap().push(Credential {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }
}

struct Harness {
    service: AuthService,
    credentials: Arc<MemoryCredentialStore>,
    sessions: Arc<MemorySessionStore>,
}

fn harness() -> Harness {
    let config = AuthConfig {
        access_secret: "test-access-secret".to_string(),
        refresh_secret: "test-refresh-secret".to_string(),
        access_ttl_minutes: 15,
        refresh_ttl_days: 7,
    };

    let credentials = Arc::new(MemoryCredentialStore::default());
    let sessions = Arc::new(MemorySessionStore::new());

    let service = AuthService::new(
        credentials.clone(),
        PasswordHasher::new(),
        TokenIssuer::new(&config),
        TokenVerifier::new(&config),
        SessionManager::new(sessions.clone()),
    );

    Harness {
        service,
        credentials,
        sessions,
    }
}

#[tokio::test]
async fn sign_up_assigns_ids_and_rejects_duplicates() {
    let h = harness();

    let id = h.service.sign_up("alice", "pw1").await.unwrap();
    assert_eq!(id, 1);

    let err = h.service.sign_up("alice", "pw1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(h.credentials.rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sign_in_rejects_bad_credentials_and_unknown_users() {
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();

    let err = h.service.sign_in("alice", "wrong").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadCredentials);

    let err = h.service.sign_in("bob", "pw1").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NoSuchUser);
}

#[tokio::test]
async fn sign_in_issues_a_pair_that_validates_immediately() {
    let h = harness();
    let id = h.service.sign_up("alice", "pw1").await.unwrap();

    let pair = h.service.sign_in("alice", "pw1").await.unwrap();
    assert_ne!(pair.access_session_id, pair.refresh_session_id);
    assert!(pair.access_expires_at < pair.refresh_expires_at);

    assert_eq!(h.service.validate(&pair.access_token).await.unwrap(), id);
    // Both sessions are live in the store.
    assert_eq!(
        h.sessions
            .get(&pair.refresh_session_id.to_string())
            .await
            .unwrap(),
        Some(id)
    );
}

#[tokio::test]
async fn refresh_rotates_to_a_disjoint_pair_and_kills_the_old_token() {
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();
    let old = h.service.sign_in("alice", "pw1").await.unwrap();

    let new = h.service.refresh(&old.refresh_token).await.unwrap();
    assert_ne!(new.access_session_id, old.access_session_id);
    assert_ne!(new.refresh_session_id, old.refresh_session_id);
    assert!(h.service.validate(&new.access_token).await.is_ok());

    // The old refresh token was consumed by the rotation.
    let err = h.service.refresh(&old.refresh_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn a_refresh_token_is_not_an_access_token() {
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();
    let pair = h.service.sign_in("alice", "pw1").await.unwrap();

    let err = h.service.validate(&pair.refresh_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);

    let err = h.service.refresh(&pair.access_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn validate_fails_closed_once_the_session_record_is_gone() {
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();
    let pair = h.service.sign_in("alice", "pw1").await.unwrap();

    // Simulate store-side expiry: the signature is still well-formed but
    // the authoritative session record no longer exists.
    h.sessions
        .delete(&pair.access_session_id.to_string())
        .await
        .unwrap();

    let err = h.service.validate(&pair.access_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn sign_out_revokes_the_access_session() {
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();
    let pair = h.service.sign_in("alice", "pw1").await.unwrap();

    h.service.sign_out(&pair.access_token).await.unwrap();

    let err = h.service.validate(&pair.access_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);

    // A second sign-out of the same token is indistinguishable from any
    // other unusable token.
    let err = h.service.sign_out(&pair.access_token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidToken);
}

#[tokio::test]
async fn sign_out_leaves_refresh_session_usable() {
    // Documented access-only revocation policy: after sign-out the
    // refresh token still rotates until its own TTL elapses.
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();
    let pair = h.service.sign_in("alice", "pw1").await.unwrap();

    h.service.sign_out(&pair.access_token).await.unwrap();

    let rotated = h.service.refresh(&pair.refresh_token).await.unwrap();
    assert!(h.service.validate(&rotated.access_token).await.is_ok());
}

#[tokio::test]
async fn concurrent_refreshes_of_one_token_have_a_single_winner() {
    let h = harness();
    h.service.sign_up("alice", "pw1").await.unwrap();
    let pair = h.service.sign_in("alice", "pw1").await.unwrap();

    let first = h.service.refresh(&pair.refresh_token).await;
    let second = h.service.refresh(&pair.refresh_token).await;

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err().kind, ErrorKind::InvalidToken);
}
