//! Credential persistence for the authenticated API client
//!
//! The backend issues a short-lived **access** credential and a longer-lived
//! **refresh** credential. This module stores them under two fixed entry
//! names and never looks inside them: expiry is validated by the server only.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TokenStore     │  get / set / remove per entry,
//! │     (trait)      │  save / load / clear per pair
//! └────────┬─────────┘
//!          │
//!          ├──► MemoryTokenStore    (process memory)
//!          ├──► FileTokenStore      (JSON document on disk)
//!          └──► KeychainTokenStore  (platform keychain, feature `platform`)
//! ```
//!
//! Writes only happen at login, refresh and logout, so the stores use
//! last-writer-wins semantics without cross-process locking.
//!
//! # Usage Example
//!
//! ```
//! use maintrack_common::auth::{CredentialPair, MemoryTokenStore, TokenStore};
//!
//! # tokio_test_block_on(async {
//! let store = MemoryTokenStore::new();
//! store.save(&CredentialPair::new("A1", "R1")).await?;
//! store.replace_access("A2").await?;
//!
//! let pair = store.load().await?.expect("stored");
//! assert_eq!(pair.access, "A2");
//! assert_eq!(pair.refresh, "R1");
//! # Ok::<(), maintrack_common::TokenStoreError>(())
//! # }).unwrap();
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

mod file;
#[cfg(feature = "platform")]
mod keychain;
mod memory;
pub mod traits;
pub mod types;

pub use file::FileTokenStore;
#[cfg(feature = "platform")]
pub use keychain::KeychainTokenStore;
pub use memory::MemoryTokenStore;
pub use traits::{TokenStore, TokenStoreError};
pub use types::{CredentialPair, TokenKey};
