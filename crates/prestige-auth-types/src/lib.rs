//! Auth types shared across Prestige services.
//!
//! Provides the bearer token codec, the reversible secret codec used for
//! verification and reset tokens, request header names, and the `Principal`
//! extractor.

pub mod headers;
pub mod identity;
pub mod secret;
pub mod token;
