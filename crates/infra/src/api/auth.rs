//! Login, logout and session status
//!
//! Talks to the JWT token endpoint directly (no bearer header, no refresh
//! protocol) and records the outcome in the shared [`Session`].

use std::sync::Arc;

use maintrack_common::CredentialPair;
use maintrack_domain::LoginCredentials;
use tracing::{info, instrument};

use super::client::ApiClient;
use super::errors::ApiError;
use super::session::Session;

/// Authentication façade
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn session(&self) -> &Arc<Session> {
        self.client.session()
    }

    /// Exchange username/password for a credential pair and store it.
    ///
    /// # Errors
    ///
    /// Rejected credentials surface as `ApiError::Unauthorized` carrying the
    /// server's message; any stored credentials are left as they were.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<CredentialPair, ApiError> {
        let url = self.client.config().token_url();
        let pair: CredentialPair = self.client.post_unauthenticated(&url, credentials).await?;

        self.session().establish(&pair).await?;
        info!("login succeeded");
        Ok(pair)
    }

    /// Forget the stored credentials. No server call is made.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.session().end().await?;
        Ok(())
    }

    /// Whether an access credential is stored. Its validity is only known to
    /// the server.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.session().access_token().await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use maintrack_common::auth::MemoryTokenStore;
    use maintrack_domain::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::super::session::SessionEvent;
    use super::*;

    fn auth_for(server: &MockServer) -> AuthApi {
        let session = Arc::new(Session::new(Arc::new(MemoryTokenStore::new())));
        let config = ApiConfig::with_base_url(format!("{}/api", server.uri()));
        AuthApi::new(Arc::new(ApiClient::new(config, session).unwrap()))
    }

    #[tokio::test]
    async fn login_stores_pair_and_emits_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token/"))
            .and(body_json(json!({ "username": "maria", "password": "s3cret" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access": "A1", "refresh": "R1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        let mut events = auth.session().subscribe();

        assert!(!auth.is_authenticated().await.unwrap());
        let pair = auth.login(&LoginCredentials::new("maria", "s3cret")).await.unwrap();

        assert_eq!(pair, CredentialPair::new("A1", "R1"));
        assert!(auth.is_authenticated().await.unwrap());
        assert_eq!(auth.session().refresh_token().await.unwrap().as_deref(), Some("R1"));
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    }

    #[tokio::test]
    async fn rejected_login_keeps_store_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({ "detail": "No active account found with the given credentials" }),
            ))
            .expect(1)
            .mount(&server)
            .await;
        // A rejected login must not go through the refresh protocol.
        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        let err = auth.login(&LoginCredentials::new("maria", "wrong")).await.unwrap_err();

        match err {
            ApiError::Unauthorized(response) => assert_eq!(
                response.message().as_deref(),
                Some("No active account found with the given credentials")
            ),
            other => panic!("expected Unauthorized, got {other:?}"),
        }
        assert!(!auth.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn logout_clears_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access": "A1", "refresh": "R1" })),
            )
            .mount(&server)
            .await;

        let auth = auth_for(&server);
        auth.login(&LoginCredentials::new("maria", "s3cret")).await.unwrap();
        let mut events = auth.session().subscribe();

        auth.logout().await.unwrap();

        assert!(!auth.is_authenticated().await.unwrap());
        assert!(auth.session().refresh_token().await.unwrap().is_none());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
        assert!(server.received_requests().await.unwrap().len() == 1);
    }
}
