//! # userhub-cache
//!
//! Session store backends for UserHub. The Redis backend is the
//! production store; the in-memory backend serves tests and single-node
//! development setups. Both implement
//! [`userhub_core::traits::SessionStore`].

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "redis-backend")]
pub mod redis;

#[cfg(feature = "memory")]
pub use memory::MemorySessionStore;
#[cfg(feature = "redis-backend")]
pub use redis::{RedisClient, RedisSessionStore};
