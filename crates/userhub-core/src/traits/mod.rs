//! Store traits seaming the orchestrator off its external collaborators.

pub mod credential_store;
pub mod session_store;

pub use credential_store::CredentialStore;
pub use session_store::SessionStore;
