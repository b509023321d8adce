//! Login input

use std::fmt;

use serde::Serialize;

/// Username/password pair exchanged for a credential pair
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let credentials = LoginCredentials::new("ana", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("ana"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn serializes_as_token_endpoint_body() {
        let credentials = LoginCredentials::new("ana", "hunter2");
        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            serde_json::json!({ "username": "ana", "password": "hunter2" })
        );
    }
}
