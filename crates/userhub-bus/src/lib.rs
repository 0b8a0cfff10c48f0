//! # userhub-bus
//!
//! The NATS request/reply surface of UserHub: one subject per
//! authentication flow, byte payloads in, byte payloads out.

pub mod handler;
pub mod payload;

pub use handler::Handler;
