//! Ambient service plumbing shared by Prestige services.
//!
//! Configuration loading, tracing, request-id middleware, health handlers,
//! the JSON response envelope, and small sea-orm / serde helpers.

pub mod config;
pub mod envelope;
pub mod health;
pub mod middleware;
pub mod race;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
