//! Keychain-backed token store
//!
//! Thin wrapper over the platform keychain (macOS Keychain Access, Windows
//! Credential Manager, the Linux kernel keyring) through `keyring`. Each fixed
//! entry name becomes one keychain item under the configured service.
//!
//! On any other target `keyring` only has its in-memory mock, so
//! [`KeychainTokenStore::has_native_backend`] reports `false` and callers
//! must not select this store there.

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::traits::{TokenStore, TokenStoreError};
use super::types::TokenKey;

/// Token store persisted in the platform keychain
#[derive(Debug, Clone)]
pub struct KeychainTokenStore {
    service_name: String,
}

impl KeychainTokenStore {
    /// Create a store for a keychain service (e.g., "Maintrack.api")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Whether this build stores credentials in a real platform keychain.
    #[must_use]
    pub const fn has_native_backend() -> bool {
        cfg!(any(target_os = "macos", target_os = "ios", target_os = "windows", target_os = "linux"))
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(&self, key: TokenKey) -> Result<Entry, TokenStoreError> {
        Entry::new(&self.service_name, key.entry_name()).map_err(|e| {
            TokenStoreError::Keychain(format!("Failed to create keychain entry {key}: {e}"))
        })
    }
}

#[async_trait]
impl TokenStore for KeychainTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError> {
        debug!(service = %self.service_name, key = %key, "Reading credential from keychain");

        match self.entry(key)?.get_password() {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(TokenStoreError::Keychain(format!("Failed to read {key}: {e}"))),
        }
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError> {
        debug!(service = %self.service_name, key = %key, "Storing credential in keychain");

        self.entry(key)?
            .set_password(value)
            .map_err(|e| TokenStoreError::Keychain(format!("Failed to store {key}: {e}")))
    }

    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError> {
        debug!(service = %self.service_name, key = %key, "Deleting credential from keychain");

        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(TokenStoreError::Keychain(format!("Failed to delete {key}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_service_name() {
        let store = KeychainTokenStore::new("MaintrackTest.api");
        assert_eq!(store.service_name(), "MaintrackTest.api");
    }

    #[cfg(any(target_os = "macos", target_os = "windows", target_os = "linux"))]
    #[test]
    fn desktop_targets_have_a_native_keychain() {
        assert!(KeychainTokenStore::has_native_backend());
    }

    // Linux keyutils calls are commonly blocked in containers, so the live
    // round trip only runs against the macOS and Windows stores.
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    #[tokio::test]
    async fn saved_pair_loads_back_from_a_fresh_store() {
        use crate::auth::types::CredentialPair;

        let service = format!("MaintrackTest.{}", std::process::id());
        KeychainTokenStore::new(&service).save(&CredentialPair::new("A1", "R1")).await.unwrap();

        let reopened = KeychainTokenStore::new(&service);
        assert_eq!(reopened.load().await.unwrap(), Some(CredentialPair::new("A1", "R1")));
        assert_eq!(reopened.access_token().await.unwrap().as_deref(), Some("A1"));

        reopened.clear().await.unwrap();
        assert!(reopened.load().await.unwrap().is_none());
        assert!(reopened.remove(TokenKey::Refresh).await.is_ok());
    }
}
