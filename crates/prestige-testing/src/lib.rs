//! Test utilities for Prestige services.
//!
//! Provides fixed test secrets, token header minting and envelope assertions.
//! Use from `dev-dependencies` only.

pub mod auth;
pub mod envelope;
