//! HTTP client wrapper for the backend API
//!
//! A single configured request sender shared by the typed service clients.
//! It injects the bearer token on every request, decodes the response
//! envelope, and maps HTTP 401 to session expiry - clearing the stored
//! token so the rest of the client falls back to the login surface.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::Envelope;
use std::sync::RwLock;

mod auth;
mod chat;
mod document;

pub use auth::AuthClient;
pub use chat::ChatClient;
pub use document::{is_supported_upload, DocumentClient, UploadError};

/// Failure of an API call, per category.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network or transport failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Business error reported by the backend.
    #[error("{0}")]
    Backend(String),

    /// HTTP 401 - the stored token is no longer accepted.
    #[error("session expired, run 'lipi login' to continue")]
    SessionExpired,
}

impl ApiError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

/// Configured request sender with bearer-token injection.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: RwLock::new(token),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    /// Adopt a freshly issued token for subsequent requests.
    pub fn set_token(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }

    /// Drop the token, in memory and on disk.
    pub fn clear_token(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
        if let Err(err) = crate::config::forget_persisted_token() {
            tracing::warn!("failed to clear stored token: {err:#}");
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        // The token is re-read for every outgoing request; login, logout
        // and the 401 handler are its only mutators.
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::POST, path).multipart(form))
            .await
    }

    /// POST with no body, for endpoints that only acknowledge.
    pub async fn post_ack(&self, path: &str) -> Result<(), ApiError> {
        self.ack(self.request(Method::POST, path)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.ack(self.request(Method::DELETE, path)).await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.send(builder).await?;
        envelope
            .into_result()
            .map_err(|err| ApiError::Backend(err.message))
    }

    async fn ack(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let envelope: Envelope<serde_json::Value> = self.send(builder).await?;
        if envelope.success {
            Ok(())
        } else {
            Err(ApiError::Backend(envelope.error_message()))
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(ApiError::SessionExpired);
        }

        // The backend wraps business errors in the envelope even on
        // non-2xx statuses, so try the envelope before giving up.
        match response.json::<Envelope<T>>().await {
            Ok(envelope) => Ok(envelope),
            Err(err) if status.is_success() => Err(ApiError::Transport(err)),
            Err(_) => Err(ApiError::Backend(format!("backend returned {status}"))),
        }
    }

    /// Global 401 handler: the session is gone, forget the credential
    /// everywhere before reporting up.
    fn expire_session(&self) {
        tracing::debug!("received 401, discarding session token");
        self.clear_token();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("http://localhost:3001/", None);
        assert_eq!(api.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_token_mutation_sites() {
        let api = ApiClient::new("http://localhost:3001", None);
        assert_eq!(api.token(), None);

        api.set_token("tok-1");
        assert_eq!(api.token().as_deref(), Some("tok-1"));

        api.set_token("tok-2");
        assert_eq!(api.token().as_deref(), Some("tok-2"));
    }

    #[test]
    fn test_session_expired_classification() {
        assert!(ApiError::SessionExpired.is_session_expired());
        assert!(!ApiError::Backend("nope".to_string()).is_session_expired());
    }
}
