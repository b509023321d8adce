//! Configuration loading
//!
//! Reads [`maintrack_domain::ClientConfig`] from files and the environment.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    apply_env_overrides, default_token_path, load, load_from_file, load_with, probe_config_paths,
};
