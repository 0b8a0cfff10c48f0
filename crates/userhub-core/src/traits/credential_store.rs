//! Credential store trait consumed by the sign-up and sign-in flows.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::Credential;

/// Durable storage of username/password-hash records.
///
/// Plain CRUD from this core's perspective; the concrete implementation
/// lives in `userhub-database`.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find a credential record by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Credential>>;

    /// Check whether a username is already taken.
    async fn exists(&self, username: &str) -> AppResult<bool>;

    /// Insert a new credential record, returning the generated user id.
    async fn insert(&self, username: &str, password_hash: &str) -> AppResult<i64>;
}
