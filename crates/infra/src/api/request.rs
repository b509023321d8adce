//! Wrapped request values
//!
//! An [`ApiRequest`] describes one logical API call independently of the
//! transport: it can be turned into a fresh `reqwest` request as many times
//! as needed (multipart bodies cannot be cloned once built), and it carries
//! an immutable attempt counter instead of a mutable "already retried" flag.

use maintrack_domain::Attachment;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;

use super::errors::ApiError;

/// Multipart form kept as plain data so it can be re-encoded on retry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    fields: Vec<(String, String)>,
    files: Vec<(String, Attachment)>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn file(mut self, name: impl Into<String>, attachment: Attachment) -> Self {
        self.files.push((name.into(), attachment));
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str()).chain(self.files.iter().map(|(n, _)| n.as_str()))
    }

    fn to_form(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for (name, attachment) in &self.files {
            let mut part =
                Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
            if let Some(content_type) = &attachment.content_type {
                part = part.mime_str(content_type).map_err(|e| {
                    ApiError::InvalidRequest(format!(
                        "invalid content type {content_type} for {}: {e}",
                        attachment.file_name
                    ))
                })?;
            }
            form = form.part(name.clone(), part);
        }
        Ok(form)
    }
}

/// Request payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(MultipartBody),
}

/// One API call, relative to the configured base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    attempt: u8,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            attempt: 0,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Serialize `body` as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    #[must_use]
    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// 0 for the first dispatch, 1 for the post-refresh retry.
    pub fn attempt(&self) -> u8 {
        self.attempt
    }

    pub fn is_retry(&self) -> bool {
        self.attempt > 0
    }

    /// The same request, marked as dispatched once more.
    #[must_use]
    pub fn retried(self) -> Self {
        Self { attempt: self.attempt.saturating_add(1), ..self }
    }

    /// Build a fresh transport request against `url`.
    pub(crate) fn to_builder(
        &self,
        builder: RequestBuilder,
    ) -> Result<RequestBuilder, ApiError> {
        let mut builder = builder.header(reqwest::header::ACCEPT, "application/json");
        if !self.query.is_empty() {
            builder = builder.query(&self.query);
        }
        Ok(match &self.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(form.to_form()?),
        })
    }
}
