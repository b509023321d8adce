//! Token store construction from configuration.

use std::sync::Arc;

use maintrack_common::auth::{FileTokenStore, MemoryTokenStore, TokenStore};
use maintrack_domain::{MaintrackError, StorageConfig, TokenStoreBackend};

/// Build the credential store selected by `config`.
///
/// # Errors
/// Returns `MaintrackError::Config` when the file backend has no path (run
/// the config through the loader first), or when the keychain backend was
/// compiled out or has no native store on this target.
pub fn open_token_store(config: &StorageConfig) -> Result<Arc<dyn TokenStore>, MaintrackError> {
    match config.backend {
        TokenStoreBackend::Memory => {
            tracing::debug!("Using in-memory token store");
            Ok(Arc::new(MemoryTokenStore::new()))
        }
        TokenStoreBackend::File => {
            let path = config.path.as_ref().ok_or_else(|| {
                MaintrackError::Config("File token store requires storage.path".into())
            })?;
            tracing::debug!(path = %path.display(), "Using file token store");
            Ok(Arc::new(FileTokenStore::new(path)))
        }
        TokenStoreBackend::Keychain => open_keychain(&config.service_name),
    }
}

#[cfg(feature = "platform")]
fn open_keychain(service_name: &str) -> Result<Arc<dyn TokenStore>, MaintrackError> {
    use maintrack_common::auth::KeychainTokenStore;

    if !KeychainTokenStore::has_native_backend() {
        return Err(MaintrackError::Config(
            "Keychain token store is unavailable: no native keychain on this platform".into(),
        ));
    }
    tracing::debug!(service = service_name, "Using keychain token store");
    Ok(Arc::new(KeychainTokenStore::new(service_name)))
}

#[cfg(not(feature = "platform"))]
fn open_keychain(_service_name: &str) -> Result<Arc<dyn TokenStore>, MaintrackError> {
    Err(MaintrackError::Config(
        "Keychain token store is unavailable: built without the `platform` feature".into(),
    ))
}
