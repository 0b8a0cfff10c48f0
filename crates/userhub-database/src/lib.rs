//! # userhub-database
//!
//! PostgreSQL connection management and the concrete credential
//! repository for UserHub.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::CredentialRepository;
