//! Configuration loader
//!
//! Loads the client configuration from a file (or defaults) and then applies
//! environment overrides.
//!
//! ## Loading Strategy
//! 1. Use the explicit path when one is given, otherwise probe the standard
//!    locations; fall back to built-in defaults when nothing is found
//! 2. Apply `MAINTRACK_*` environment overrides
//! 3. Validate URLs and fill in the per-user credential file path
//!
//! ## Environment Variables
//! - `MAINTRACK_API_URL`: resource base URL (e.g. `https://host/api`)
//! - `MAINTRACK_AUTH_URL`: root of the token endpoints, when it differs
//! - `MAINTRACK_HTTP_TIMEOUT`: request timeout in seconds
//! - `MAINTRACK_TOKEN_STORE`: `keychain`, `file` or `memory`
//! - `MAINTRACK_TOKEN_PATH`: credential file for the `file` store
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./maintrack.toml`, `./maintrack.json`
//! 2. `./config.toml`, `./config.json`
//! 3. `~/.maintrack/config.toml`, `~/.maintrack/config.json`

use std::path::{Path, PathBuf};

use maintrack_domain::{ClientConfig, MaintrackError, Result, TokenStoreBackend};
use url::Url;

pub const ENV_API_URL: &str = "MAINTRACK_API_URL";
pub const ENV_AUTH_URL: &str = "MAINTRACK_AUTH_URL";
pub const ENV_HTTP_TIMEOUT: &str = "MAINTRACK_HTTP_TIMEOUT";
pub const ENV_TOKEN_STORE: &str = "MAINTRACK_TOKEN_STORE";
pub const ENV_TOKEN_PATH: &str = "MAINTRACK_TOKEN_PATH";

const USER_DIR: &str = ".maintrack";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Load configuration from the standard locations plus the environment.
///
/// # Errors
/// Returns `MaintrackError::Config` if a config file exists but cannot be
/// parsed, or if an override or URL is invalid.
pub fn load() -> Result<ClientConfig> {
    load_with(None)
}

/// Like [`load`], but reads `path` instead of probing when given.
///
/// # Errors
/// Returns `MaintrackError::Config` if `path` does not exist, or for any of
/// the reasons listed on [`load`].
pub fn load_with(path: Option<PathBuf>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => load_from_file(Some(path))?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(Some(found))?,
            None => {
                tracing::debug!("No config file found, using defaults");
                ClientConfig::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    finalize(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is picked by
/// extension (`.json` or `.toml`). No environment overrides are applied.
///
/// # Errors
/// Returns `MaintrackError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MaintrackError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MaintrackError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MaintrackError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, detecting the format from the
/// extension of `path`.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MaintrackError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MaintrackError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(MaintrackError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend([
            cwd.join("maintrack.toml"),
            cwd.join("maintrack.json"),
            cwd.join("config.toml"),
            cwd.join("config.json"),
        ]);
    }

    if let Some(user_dir) = user_dir() {
        candidates.extend([user_dir.join("config.toml"), user_dir.join("config.json")]);
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Apply `MAINTRACK_*` variables from the process environment.
///
/// # Errors
/// Returns `MaintrackError::Config` for unparsable values.
pub fn apply_env_overrides(config: &mut ClientConfig) -> Result<()> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = var(ENV_API_URL) {
        config.api.base_url = url;
    }
    if let Some(url) = var(ENV_AUTH_URL) {
        config.api.auth_base_url = Some(url);
    }
    if let Some(raw) = var(ENV_HTTP_TIMEOUT) {
        let secs = raw.parse::<u64>().map_err(|e| {
            MaintrackError::Config(format!("Invalid {ENV_HTTP_TIMEOUT} '{raw}': {e}"))
        })?;
        config.api.timeout_secs = Some(secs);
    }
    if let Some(raw) = var(ENV_TOKEN_STORE) {
        config.storage.backend = raw
            .parse::<TokenStoreBackend>()
            .map_err(|e| MaintrackError::Config(format!("{ENV_TOKEN_STORE}: {e}")))?;
    }
    if let Some(path) = var(ENV_TOKEN_PATH) {
        config.storage.path = Some(PathBuf::from(path));
    }

    Ok(())
}

/// Validate URLs and resolve the default credential file.
pub fn finalize(mut config: ClientConfig) -> Result<ClientConfig> {
    validate_url("api.base_url", &config.api.base_url)?;
    if let Some(auth) = &config.api.auth_base_url {
        validate_url("api.auth_base_url", auth)?;
    }
    if config.api.timeout_secs == Some(0) {
        return Err(MaintrackError::Config("api.timeout_secs must be greater than zero".into()));
    }

    if config.storage.backend == TokenStoreBackend::File && config.storage.path.is_none() {
        config.storage.path = Some(default_token_path().ok_or_else(|| {
            MaintrackError::Config(format!(
                "Cannot locate a home directory for the credential file; set {ENV_TOKEN_PATH}"
            ))
        })?);
    }

    Ok(config)
}

/// `~/.maintrack/credentials.json`
pub fn default_token_path() -> Option<PathBuf> {
    user_dir().map(|dir| dir.join(CREDENTIALS_FILE))
}

fn user_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(USER_DIR))
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| MaintrackError::Config(format!("Invalid {field} '{value}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(MaintrackError::Config(format!(
            "Invalid {field} '{value}': unsupported scheme {other}"
        ))),
    }
}
