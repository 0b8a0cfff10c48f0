//! Session persistence, liveness, and revocation.

pub mod manager;

pub use manager::SessionManager;
