//! Typed wrapper over the auth endpoints

use shared::{AuthData, LoginRequest, MeData, SignupRequest, User};
use std::sync::Arc;

use super::{ApiClient, ApiError};

#[derive(Clone)]
pub struct AuthClient {
    api: Arc<ApiClient>,
}

impl AuthClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Exchange credentials for a user and a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthData, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.post("/api/auth/login", &body).await
    }

    /// Create an account; authenticates like a login on success.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthData, ApiError> {
        let body = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.api.post("/api/auth/signup", &body).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.post_ack("/api/auth/logout").await
    }

    /// Resolve the identity behind the current token.
    pub async fn me(&self) -> Result<User, ApiError> {
        let data: MeData = self.api.get("/api/auth/me").await?;
        Ok(data.user)
    }
}
