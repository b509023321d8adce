//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Maintrack
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum MaintrackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Maintrack operations
pub type Result<T> = std::result::Result<T, MaintrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let err = MaintrackError::Network("connection refused".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "Network");
        assert_eq!(json["message"], "connection refused");
    }

    #[test]
    fn display_includes_category() {
        let err = MaintrackError::Config("missing base url".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing base url");
    }
}
