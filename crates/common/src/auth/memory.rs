//! In-memory token store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{TokenStore, TokenStoreError};
use super::types::{CredentialPair, TokenKey};

/// Token store that lives and dies with the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<TokenKey, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential pair.
    pub fn with_pair(pair: &CredentialPair) -> Self {
        let store = Self::new();
        {
            let mut entries = store.entries.write();
            entries.insert(TokenKey::Access, pair.access.clone());
            entries.insert(TokenKey::Refresh, pair.refresh.clone());
        }
        store
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError> {
        Ok(self.entries.read().get(&key).cloned())
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError> {
        self.entries.write().insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError> {
        self.entries.write().remove(&key);
        Ok(())
    }
}
