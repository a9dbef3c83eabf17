//! HTTP client wrapper for the CancApp backend.
//!
//! [`ApiClient`] resolves a relative [`ApiRequest`] against the configured base
//! URL, attaches the credential the request asks for, performs the call and
//! hands back either the decoded payload or a normalized [`ApiError`]. There
//! is no retry policy; every failure is reported once.

use super::envelope::Envelope;
use super::error::ApiError;
use super::request::{ApiRequest, Auth, FormValue, MultipartBody, RequestBody};
use crate::domain::error::{CancappError, Result};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::Instrument;
use url::Url;

/// Thin wrapper over a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` (for example `https://cancapp.runasp.net/api`).
    ///
    /// # Errors
    ///
    /// Returns [`CancappError::Config`] if `base_url` is not an absolute
    /// hierarchical URL, and [`CancappError::Http`] if the TLS backend cannot
    /// be initialized.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CancappError::Config(format!("invalid base_url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CancappError::Config(format!(
                "base_url {base_url} cannot carry a path"
            )));
        }

        let mut builder =
            reqwest::Client::builder().user_agent(concat!("cancapp/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| CancappError::Http(e.to_string()))?;

        tracing::debug!(base_url = %base_url, timeout = ?timeout, "api client ready");
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends `request` and decodes the payload, unwrapping a `value` envelope.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for transport failures, non-2xx responses
    /// and payloads that do not match `T`.
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> std::result::Result<T, ApiError> {
        let (status, body) = self.send(&request).await?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(Envelope::into_inner)
            .map_err(|e| {
                tracing::warn!(path = %request.path(), error = %e, "unexpected response payload");
                ApiError {
                    message: request.fallback.to_string(),
                    status: Some(status),
                }
            })
    }

    /// Like [`Self::call`], but an empty or non-matching success body yields `None`.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for transport failures and non-2xx responses.
    pub async fn call_optional<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> std::result::Result<Option<T>, ApiError> {
        let (_, body) = self.send(&request).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str::<Envelope<T>>(&body)
            .ok()
            .map(Envelope::into_inner))
    }

    /// Sends `request` and discards the success body.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for transport failures and non-2xx responses.
    pub async fn call_unit(&self, request: ApiRequest) -> std::result::Result<(), ApiError> {
        self.send(&request).await.map(|_| ())
    }

    async fn send(&self, request: &ApiRequest) -> std::result::Result<(u16, String), ApiError> {
        let span = tracing::debug_span!("api_request",
            method = %request.method,
            path = %request.path()
        );
        self.send_inner(request).instrument(span).await
    }

    async fn send_inner(&self, request: &ApiRequest) -> std::result::Result<(u16, String), ApiError> {
        let url = self.url_for(request)?;

        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match &request.auth {
            Auth::None => builder,
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::TokenHeader(token) => builder.header("token", token),
        };
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(build_form(form, request.fallback)?),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request did not reach the server");
            ApiError::new(request.fallback)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(error = %e, status = status.as_u16(), "failed to read response body");
            ApiError {
                message: request.fallback.to_string(),
                status: Some(status.as_u16()),
            }
        })?;

        if status.is_success() {
            tracing::debug!(status = status.as_u16(), bytes = body.len(), "request succeeded");
            Ok((status.as_u16(), body))
        } else {
            let error = ApiError::from_response(status.as_u16(), &body, request.fallback);
            tracing::debug!(status = status.as_u16(), error = %error.message, "request rejected");
            Err(error)
        }
    }

    fn url_for(&self, request: &ApiRequest) -> std::result::Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::new(request.fallback))?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

fn build_form(body: &MultipartBody, fallback: &str) -> std::result::Result<Form, ApiError> {
    let mut form = Form::new();
    for (name, value) in &body.fields {
        form = match value {
            FormValue::Text(text) => form.text(name.clone(), text.clone()),
            FormValue::File(upload) => {
                let part = Part::bytes(upload.bytes.clone())
                    .file_name(upload.file_name.clone())
                    .mime_str(&upload.mime)
                    .map_err(|e| {
                        tracing::warn!(mime = %upload.mime, error = %e, "rejected upload mime type");
                        ApiError::new(fallback)
                    })?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_segments_onto_base_path() {
        let client = ApiClient::new("https://cancapp.runasp.net/api/", None).unwrap();
        let request = ApiRequest::get("post", "x").segment("42");
        let url = client.url_for(&request).unwrap();
        assert_eq!(url.as_str(), "https://cancapp.runasp.net/api/post/42");
    }

    #[test]
    fn encodes_untrusted_segments() {
        let client = ApiClient::new("https://cancapp.runasp.net/api", None).unwrap();
        let request = ApiRequest::delete("post", "x").segment("4/2");
        let url = client.url_for(&request).unwrap();
        assert_eq!(url.path(), "/api/post/4%2F2");
    }

    #[test]
    fn rejects_non_hierarchical_base() {
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", None),
            Err(CancappError::Config(_))
        ));
    }
}
