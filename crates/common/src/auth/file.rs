//! File-backed token store
//!
//! Persists the two entries as a small JSON document:
//!
//! ```json
//! { "access_token": "…", "refresh_token": "…" }
//! ```
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! crash never leaves a half-written document behind. On Unix the file is
//! created with mode `0600`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::traits::{TokenStore, TokenStoreError};
use super::types::TokenKey;

type Document = BTreeMap<String, String>;

/// Token store persisted to a JSON file
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document, TokenStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
                TokenStoreError::Corrupted(format!("{}: {err}", self.path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_document(&self, document: &Document) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        restrict_permissions(&tmp_path).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), entries = document.len(), "Token file written");
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> Result<(), TokenStoreError>
    where
        F: FnOnce(&mut Document) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        apply(&mut document);
        self.write_document(&document).await
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: TokenKey) -> Result<Option<String>, TokenStoreError> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key.entry_name()))
    }

    async fn set(&self, key: TokenKey, value: &str) -> Result<(), TokenStoreError> {
        let value = value.to_string();
        self.update(move |document| {
            document.insert(key.entry_name().to_string(), value);
        })
        .await
    }

    async fn remove(&self, key: TokenKey) -> Result<(), TokenStoreError> {
        self.update(|document| {
            document.remove(key.entry_name());
        })
        .await
    }
}
