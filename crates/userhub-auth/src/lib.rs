//! # userhub-auth
//!
//! Token issuance and session lifecycle for UserHub.
//!
//! ## Modules
//!
//! - `password` — Argon2id credential hashing and verification
//! - `token` — typed claims, HMAC-SHA256 token minting and verification
//! - `session` — session persistence, liveness, and revocation over the
//!   pluggable session store

pub mod password;
pub mod session;
pub mod token;

pub use password::PasswordHasher;
pub use session::SessionManager;
pub use token::{AccessClaims, RefreshClaims, TokenIssuer, TokenPair, TokenVerifier};
