//! Conversions from external infrastructure errors into domain errors.

use maintrack_common::TokenStoreError;
use maintrack_domain::MaintrackError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MaintrackError);

impl From<InfraError> for MaintrackError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MaintrackError> for InfraError {
    fn from(value: MaintrackError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMaintrackError {
    fn into_maintrack(self) -> MaintrackError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MaintrackError */
/* -------------------------------------------------------------------------- */

impl IntoMaintrackError for HttpError {
    fn into_maintrack(self) -> MaintrackError {
        if self.is_timeout() {
            return MaintrackError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return MaintrackError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return MaintrackError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        MaintrackError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_maintrack())
    }
}

/* -------------------------------------------------------------------------- */
/* TokenStoreError → MaintrackError */
/* -------------------------------------------------------------------------- */

impl IntoMaintrackError for TokenStoreError {
    fn into_maintrack(self) -> MaintrackError {
        MaintrackError::Storage(self.to_string())
    }
}

impl From<TokenStoreError> for InfraError {
    fn from(value: TokenStoreError) -> Self {
        InfraError(value.into_maintrack())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
