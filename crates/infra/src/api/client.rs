//! Authenticated API client
//!
//! Every call goes through [`ApiClient::execute`]:
//!
//! 1. attach `Authorization: Bearer <access>` when an access credential is
//!    stored (none stored is not an error),
//! 2. on a 401 for a first attempt, refresh the access credential once
//!    (coalesced with any concurrent refresh) and re-dispatch the request,
//! 3. map every other non-2xx status to a typed [`ApiError`].
//!
//! A failed or impossible refresh clears the credentials, emits
//! [`SessionEvent::Expired`](super::SessionEvent::Expired) and ends the call
//! with [`ApiError::SessionExpired`]. Transport failures are never retried.

use std::sync::Arc;

use maintrack_domain::ApiConfig;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::errors::ApiError;
use super::request::ApiRequest;
use super::session::Session;
use crate::http::HttpClient;

/// Body of a successful refresh (`{"access": …}`, `refresh` when rotated)
#[derive(Debug, Deserialize)]
struct RefreshedCredentials {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// API client bound to one backend and one session
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    config: ApiConfig,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client with a transport built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built
    pub fn new(config: ApiConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let mut builder = HttpClient::builder().timeout_opt(config.timeout());
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {}", e)))?;

        Ok(Self::with_http_client(config, session, http))
    }

    /// Create a client over an existing transport.
    pub fn with_http_client(config: ApiConfig, session: Arc<Session>, http: HttpClient) -> Self {
        Self { http, config, session }
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// GET `path` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::get(path)).await
    }

    /// POST `body` as JSON to `path`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    /// PATCH `body` as JSON to `path`.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(ApiRequest::patch(path).json(body)?).await
    }

    /// DELETE `path`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(ApiRequest::delete(path)).await
    }

    /// Run `request` through the authenticated pipeline.
    ///
    /// # Errors
    ///
    /// - `ApiError::SessionExpired` when a 401 could not be recovered by a
    ///   refresh (credentials are cleared)
    /// - `ApiError::Unauthorized` when the retried request is rejected again
    /// - a status-specific variant for any other non-2xx response
    /// - `ApiError::Network` / `ApiError::Decode` for transport and body
    ///   failures
    #[instrument(skip(self, request), fields(method = %request.method(), path = %request.path()))]
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let (generation, access) = self.session.snapshot().await?;
        let response = self.dispatch(&request, access.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || request.is_retry() {
            return Self::decode(response).await;
        }

        debug!("access credential rejected, refreshing");
        let retry = request.retried();
        let access = self.refresh_access(generation).await?;
        let response = self.dispatch(&retry, Some(&access)).await?;
        Self::decode(response).await
    }

    /// POST to an absolute URL without credentials and without the refresh
    /// protocol (token endpoints).
    #[instrument(skip(self, body))]
    pub(crate) async fn post_unauthenticated<B, T>(&self, url: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .http
            .request(Method::POST, url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body);
        let response = self.http.send(builder).await?;
        Self::decode(response).await
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
    ) -> Result<Response, ApiError> {
        let url = self.config.resource_url(request.path());
        let mut builder = request.to_builder(self.http.request(request.method().clone(), &url))?;
        if let Some(token) = access {
            builder = builder.bearer_auth(token);
        }

        debug!(attempt = request.attempt(), authenticated = access.is_some(), "dispatching");
        Ok(self.http.send(builder).await?)
    }

    /// Obtain a usable access credential after a 401.
    ///
    /// `seen_generation` is the session generation the rejected request was
    /// sent with. If the session moved on since then, another request has
    /// already refreshed (or someone logged in) and that credential is reused.
    async fn refresh_access(&self, seen_generation: u64) -> Result<String, ApiError> {
        let _gate = self.session.refresh_gate().await;

        if self.session.generation() != seen_generation {
            if let Some(access) = self.session.access_token().await? {
                debug!("reusing credential refreshed by a concurrent request");
                return Ok(access);
            }
        }

        let Some(refresh) = self.session.refresh_token().await? else {
            let reason = "no refresh credential stored";
            self.session.expire(reason).await;
            return Err(ApiError::SessionExpired(reason.to_string()));
        };

        let url = self.config.token_refresh_url();
        match self
            .post_unauthenticated::<_, RefreshedCredentials>(&url, &RefreshRequest { refresh: &refresh })
            .await
        {
            Ok(credentials) => {
                self.session
                    .refreshed(&credentials.access, credentials.refresh.as_deref())
                    .await?;
                Ok(credentials.access)
            }
            Err(err) => {
                let reason = format!("refresh failed: {err}");
                self.session.expire(&reason).await;
                Err(ApiError::SessionExpired(reason))
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(%status, %url, "request failed");
            return Err(ApiError::from_status(status, &url, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response from {url}: {e}")))?;

        // 204/205 carry no body by definition; some endpoints send an empty 200.
        if status == StatusCode::NO_CONTENT
            || status == StatusCode::RESET_CONTENT
            || bytes.iter().all(u8::is_ascii_whitespace)
        {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Decode(format!(
                    "{url} returned no content ({}), but a body was expected",
                    status.as_u16()
                ))
            });
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Decode(format!("Failed to parse response from {url}: {e}")))
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiConfig>,
    session: Option<Arc<Session>>,
    http: Option<HttpClient>,
}

impl ApiClientBuilder {
    /// Set the API configuration
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the session the client authenticates with
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Use a preconfigured transport instead of building one from the config
    pub fn http_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Build the API client
    ///
    /// # Errors
    ///
    /// Returns error if the session is missing or client creation fails
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config = self.config.unwrap_or_default();
        let session = self.session.ok_or_else(|| ApiError::Config("Session not set".to_string()))?;

        match self.http {
            Some(http) => Ok(ApiClient::with_http_client(config, session, http)),
            None => ApiClient::new(config, session),
        }
    }
}
