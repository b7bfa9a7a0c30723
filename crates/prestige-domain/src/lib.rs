//! Domain types shared across Prestige crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Shared by the service layers and the auth types crate.

pub mod access;
pub mod account;
pub mod pagination;
