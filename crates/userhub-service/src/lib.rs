//! # userhub-service
//!
//! The request-level state machine driving sign-up, sign-in, refresh,
//! sign-out, and validate flows. Composes the credential verifier, token
//! issuer, and session manager via explicit dependency injection.

pub mod auth;

pub use auth::AuthService;
