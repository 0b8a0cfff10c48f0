//! Domain types shared across UserHub crates.

pub mod credential;

pub use credential::Credential;
