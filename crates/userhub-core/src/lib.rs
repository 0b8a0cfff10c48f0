//! # userhub-core
//!
//! Core crate for UserHub. Contains configuration schemas, the store
//! traits that seam the orchestrator off its collaborators, domain types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other UserHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
