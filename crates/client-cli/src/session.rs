//! Session lifecycle - who is logged in, and as whom
//!
//! The session is an explicitly constructed object owned by the entry
//! point and handed to the surfaces that need it. It starts in
//! `Initializing`, resolves the persisted token once, and from then on
//! is the single writer of authentication state. Token persistence is
//! delegated to the config file; the bearer token used on the wire lives
//! in the [`ApiClient`].

use shared::{AuthData, User};
use std::sync::Arc;

use crate::api::{ApiClient, ApiError, AuthClient};
use crate::config;

/// Authentication state of this process.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup state while the persisted token is being checked.
    Initializing,
    /// No usable credentials.
    Anonymous,
    /// Logged in as the given user.
    Authenticated(User),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not logged in")]
    NotAuthenticated,
}

pub struct Session {
    api: Arc<ApiClient>,
    auth: AuthClient,
    state: SessionState,
}

impl Session {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let auth = AuthClient::new(api.clone());
        Self {
            api,
            auth,
            state: SessionState::Initializing,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// The logged-in user. Misuse (asking before the session resolved,
    /// or after logout) is a reportable condition, not a panic.
    pub fn user(&self) -> Result<&User, SessionError> {
        match &self.state {
            SessionState::Authenticated(user) => Ok(user),
            _ => Err(SessionError::NotAuthenticated),
        }
    }

    /// Resolve the persisted token into a user, once, at startup.
    ///
    /// Any failure - network, expired or revoked token - discards the
    /// token and resolves to `Anonymous`. The error is logged and never
    /// surfaced: this check also runs for surfaces that work without a
    /// login.
    pub async fn initialize(&mut self) {
        if self.api.token().is_none() {
            self.state = SessionState::Anonymous;
            return;
        }

        let outcome = self.auth.me().await;
        self.state = Self::resolve_check(outcome);
        if self.state == SessionState::Anonymous {
            self.api.clear_token();
        }
    }

    /// Pure mapping from the identity-check outcome to a state.
    fn resolve_check(outcome: Result<User, ApiError>) -> SessionState {
        match outcome {
            Ok(user) => SessionState::Authenticated(user),
            Err(err) => {
                tracing::debug!("identity check failed: {err}");
                SessionState::Anonymous
            }
        }
    }

    /// Log in and persist the token for subsequent runs. Failures leave
    /// the current state untouched and are returned to the caller.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, ApiError> {
        let auth = self.auth.login(email, password).await?;
        Ok(self.adopt(auth))
    }

    /// Create an account; establishes a session exactly like `login`.
    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let auth = self.auth.signup(name, email, password).await?;
        Ok(self.adopt(auth))
    }

    fn adopt(&mut self, auth: AuthData) -> User {
        self.api.set_token(&auth.token);
        if let Err(err) = config::persist_token(&auth.token) {
            tracing::warn!("failed to persist token: {err:#}");
        }
        self.state = SessionState::Authenticated(auth.user.clone());
        auth.user
    }

    /// Log out. The backend call is best-effort; local cleanup happens
    /// regardless of its outcome.
    pub async fn logout(&mut self) {
        if let Err(err) = self.auth.logout().await {
            tracing::warn!("remote logout failed: {err}");
        }
        self.api.clear_token();
        self.state = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            email: "asha@example.in".to_string(),
            name: "Asha".to_string(),
            role: "user".to_string(),
            created_at: None,
        }
    }

    fn session() -> Session {
        Session::new(Arc::new(ApiClient::new("http://localhost:3001", None)))
    }

    #[test]
    fn test_successful_check_authenticates() {
        let state = Session::resolve_check(Ok(user()));
        assert_eq!(state, SessionState::Authenticated(user()));
    }

    #[test]
    fn test_failed_check_resolves_anonymous_without_propagating() {
        let state = Session::resolve_check(Err(ApiError::Backend("boom".to_string())));
        assert_eq!(state, SessionState::Anonymous);

        let state = Session::resolve_check(Err(ApiError::SessionExpired));
        assert_eq!(state, SessionState::Anonymous);
    }

    #[test]
    fn test_user_accessor_fails_fast_outside_authenticated() {
        let mut session = session();
        assert!(matches!(
            session.user(),
            Err(SessionError::NotAuthenticated)
        ));
        assert!(!session.is_authenticated());

        session.state = SessionState::Anonymous;
        assert!(session.user().is_err());

        session.state = SessionState::Authenticated(user());
        assert_eq!(session.user().unwrap().name, "Asha");
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_new_session_starts_initializing() {
        let session = session();
        assert_eq!(*session.state(), SessionState::Initializing);
    }
}
