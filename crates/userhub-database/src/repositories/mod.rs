//! Concrete repository implementations.

pub mod credential;

pub use credential::CredentialRepository;
