//! Shared building blocks for Maintrack crates.
//!
//! # Feature Tiers
//!
//! - default: credential types, the [`auth::TokenStore`] port, in-memory and
//!   file-backed stores
//! - `platform`: adds the keychain-backed store (`keyring`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

pub use auth::{CredentialPair, TokenKey, TokenStore, TokenStoreError};
