//! Authentication lifecycle
//!
//! Owns the persisted session and publishes every change on a
//! [`tokio::sync::watch`] channel, so anything holding a receiver sees
//! login and logout as they happen.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::RubikResult;
use crate::gateway::Backend;
use crate::models::{Registration, User};
use crate::storage::SessionStore;

use super::validation::{validate_login, validate_registration};

/// Who is signed in, as seen by subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    SignedIn(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}

/// Service for login, registration and logout
pub struct AuthService {
    backend: Arc<dyn Backend>,
    sessions: SessionStore,
    state: watch::Sender<SessionState>,
}

impl AuthService {
    /// Create the service in the signed-out state. Call [`Self::restore`] to
    /// pick up a session persisted by an earlier run.
    pub fn new(backend: Arc<dyn Backend>, sessions: SessionStore) -> Self {
        let (state, _) = watch::channel(SessionState::SignedOut);
        Self {
            backend,
            sessions,
            state,
        }
    }

    /// Receiver that observes every session change. It reports the sender
    /// closed once this service is dropped.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Load the persisted session, if any, and publish it
    pub fn restore(&self) -> RubikResult<Option<User>> {
        let user = self.sessions.get_session()?.map(|s| s.user);
        let state = match &user {
            Some(user) => SessionState::SignedIn(user.clone()),
            None => SessionState::SignedOut,
        };
        self.state.send_replace(state);
        Ok(user)
    }

    /// Authenticate and persist the session. On failure nothing is stored.
    pub async fn login(&self, email: &str, password: &str) -> RubikResult<User> {
        validate_login(email, password)?;

        let outcome = match self.backend.login(email.trim(), password).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                return Err(e);
            }
        };

        self.sessions.set_session(&outcome.user, &outcome.token)?;
        tracing::info!(user = %outcome.user.email, "logged in");
        self.state
            .send_replace(SessionState::SignedIn(outcome.user.clone()));
        Ok(outcome.user)
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, form: &Registration) -> RubikResult<()> {
        validate_registration(form)?;
        self.backend
            .register(form.name.trim(), form.email.trim(), &form.password)
            .await?;
        tracing::info!(user = %form.email.trim(), "registered");
        Ok(())
    }

    /// Clear the local session. The backend is told first, but neither its
    /// answer nor an unreadable stored token stops the local logout.
    pub async fn logout(&self) -> RubikResult<()> {
        match self.sessions.get_token() {
            Ok(Some(token)) => {
                if let Err(e) = self.backend.logout(&token).await {
                    tracing::warn!(
                        error = %e,
                        "backend logout failed; clearing local session anyway"
                    );
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "could not read stored token"),
        }
        self.sessions.clear_session()?;
        self.state.send_replace(SessionState::SignedOut);
        tracing::info!("logged out");
        Ok(())
    }
}
