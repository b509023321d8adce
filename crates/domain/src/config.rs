//! Configuration structures
//!
//! Plain data; loading (files, environment) lives in `maintrack-infra`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Local development backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Keychain service used when none is configured.
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "Maintrack.api";

const TOKEN_PATH: &str = "/api/token/";
const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";

/// Top-level client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Backend location and transport settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the REST resources, e.g. `http://localhost:8000/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Root the token endpoints hang off. Derived from `base_url` when unset.
    #[serde(default)]
    pub auth_base_url: Option<String>,
    /// Request timeout; `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_base_url: None,
            timeout_secs: None,
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Absolute URL for a resource path such as `/requisicoes/`.
    pub fn resource_url(&self, path: &str) -> String {
        join(&self.base_url, path)
    }

    /// Login endpoint (`…/api/token/`).
    pub fn token_url(&self) -> String {
        join(&self.auth_root(), TOKEN_PATH)
    }

    /// Refresh endpoint (`…/api/token/refresh/`).
    pub fn token_refresh_url(&self) -> String {
        join(&self.auth_root(), TOKEN_REFRESH_PATH)
    }

    /// Host root for the token endpoints: the explicit override, or the
    /// resource base with a trailing `/api` segment removed.
    fn auth_root(&self) -> String {
        if let Some(explicit) = &self.auth_base_url {
            return explicit.trim_end_matches('/').to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        base.strip_suffix("/api").unwrap_or(base).to_string()
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Where credentials are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreBackend {
    /// Platform keychain (macOS Keychain, Windows Credential Manager, Secret
    /// Service)
    Keychain,
    /// JSON file on disk
    #[default]
    File,
    /// Process memory only; forgotten on exit
    Memory,
}

crate::impl_wire_code_conversions!(TokenStoreBackend {
    Keychain => "keychain",
    File => "file",
    Memory => "memory",
});

/// Credential persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: TokenStoreBackend,
    /// File backend location; the loader fills in a per-user default.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: TokenStoreBackend::default(),
            path: None,
            service_name: default_service_name(),
        }
    }
}

fn default_service_name() -> String {
    DEFAULT_KEYCHAIN_SERVICE.to_string()
}
