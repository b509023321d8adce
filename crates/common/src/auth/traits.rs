//! Token store port
//!
//! Abstracts credential persistence so the request pipeline can be tested
//! with an in-memory store and shipped with a file or keychain store.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{CredentialPair, TokenKey};

/// Errors raised by token store backends
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Filesystem access failed
    #[error("Token store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded
    #[error("Token store serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Platform keychain rejected the operation
    #[error("Keychain access failed: {0}")]
    Keychain(String),

    /// Stored document exists but is not a credential document
    #[error("Token store is corrupted: {0}")]
    Corrupted(String),
}

/// Persistent storage for the access/refresh credential pair
///
/// Backends implement the three per-entry primitives; the pair-level
/// operations are provided on top of them.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read one entry. A missing entry is `Ok(None)`, never an error.
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError>;

    /// Write one entry, replacing any previous value.
    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError>;

    /// Delete one entry (idempotent).
    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError>;

    /// Persist both credentials.
    async fn save(&self, pair: &CredentialPair) -> Result<(), TokenStoreError> {
        self.set(TokenKey::Access, &pair.access).await?;
        self.set(TokenKey::Refresh, &pair.refresh).await
    }

    /// Both credentials, or `None` unless both are present.
    async fn load(&self) -> Result<Option<CredentialPair>, TokenStoreError> {
        let access = self.get(TokenKey::Access).await?;
        let refresh = self.get(TokenKey::Refresh).await?;
        Ok(access.zip(refresh).map(|(access, refresh)| CredentialPair { access, refresh }))
    }

    /// Forget both credentials (idempotent).
    async fn clear(&self) -> Result<(), TokenStoreError> {
        self.remove(TokenKey::Access).await?;
        self.remove(TokenKey::Refresh).await
    }

    /// Swap the access credential after a refresh, keeping the refresh one.
    async fn replace_access(&self, access: &str) -> Result<(), TokenStoreError> {
        self.set(TokenKey::Access, access).await
    }

    async fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.get(TokenKey::Access).await
    }

    async fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.get(TokenKey::Refresh).await
    }
}
