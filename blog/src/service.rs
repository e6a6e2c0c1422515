//! User session service: token → identifier → CMS user → published state.
//!
//! ARCHITECTURE
//! ============
//! `refresh` is the only path to `SignedIn`. It reads the stored token,
//! decodes the user id from its payload, publishes `Loading`, and asks the CMS
//! for the user record. The decoded id is only a lookup key: a token whose
//! payload names a user the CMS will not return leaves the session signed out.
//!
//! Every failure (no token, malformed token, network, non-2xx, bad body)
//! resolves to `SignedOut`. Nothing is retried; the next page mount or user
//! action calls `refresh` again.

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::sync::Arc;

use crate::cms::{CmsApi, CmsError, LoginRequest, RegisterRequest};
use crate::credentials::{CredentialError, CredentialStore};
use crate::status::SessionState;
use crate::store::SessionStore;
use crate::token;
use crate::validate::{ValidationFailure, validate_login, validate_signup};

/// Why a login or signup did not produce a stored token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    #[error(transparent)]
    Cms(#[from] CmsError),

    #[error(transparent)]
    Storage(#[from] CredentialError),
}

impl AuthError {
    /// User-facing notices for a failed login or signup.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        match self {
            Self::Invalid(failure) => failure.notices().map(str::to_owned).collect(),
            Self::Cms(CmsError::Validation { message, .. } | CmsError::Status { status: 400..=499, message })
                if !message.is_empty() =>
            {
                vec![message.clone()]
            }
            Self::Cms(CmsError::Transport(_)) => vec!["Could not reach the server. Try again.".to_owned()],
            Self::Cms(_) => vec!["Invalid user credentials".to_owned()],
            Self::Storage(_) => vec!["Could not save your session on this device.".to_owned()],
        }
    }
}

/// Session orchestration over a CMS transport and a credential store.
pub struct SessionService<C, S> {
    cms: C,
    credentials: S,
    store: Arc<SessionStore>,
}

impl<C, S> SessionService<C, S>
where
    C: CmsApi,
    S: CredentialStore,
{
    /// Service with its own fresh store.
    pub fn new(cms: C, credentials: S) -> Self {
        Self::with_store(cms, credentials, Arc::new(SessionStore::new()))
    }

    /// Service publishing into an existing shared store.
    pub fn with_store(cms: C, credentials: S, store: Arc<SessionStore>) -> Self {
        Self { cms, credentials, store }
    }

    pub fn cms(&self) -> &C {
        &self.cms
    }

    pub fn credentials(&self) -> &S {
        &self.credentials
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Synchronous token presence check used by route guards.
    pub fn has_token(&self) -> bool {
        self.credentials.get().is_some()
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Re-derive the session from the stored token and the CMS.
    ///
    /// Returns the state current after this refresh settles. If a newer
    /// refresh or a logout started meanwhile, that newer state is returned
    /// and this call's result is discarded.
    pub async fn refresh(&self) -> SessionState {
        let ticket = self.store.begin();

        let Some(raw) = self.credentials.get() else {
            tracing::debug!("no stored token; session signed out");
            self.store.resolve(ticket, SessionState::SignedOut);
            return self.store.snapshot();
        };

        let id = match token::user_id(&raw) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "stored token unusable; session signed out");
                self.store.resolve(ticket, SessionState::SignedOut);
                return self.store.snapshot();
            }
        };

        self.store.mark_loading(ticket);

        let next = match self.cms.fetch_user(id).await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.id, "session refreshed");
                SessionState::SignedIn(profile)
            }
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "user fetch failed; session signed out");
                SessionState::SignedOut
            }
        };

        if !self.store.resolve(ticket, next) {
            tracing::debug!(user_id = %id, "refresh superseded; result dropped");
        }
        self.store.snapshot()
    }

    /// Clear the token and publish `SignedOut`. No network call.
    ///
    /// The store is reset even if clearing the persisted token fails.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the token could not be removed.
    pub fn logout(&self) -> Result<(), CredentialError> {
        let cleared = self.credentials.clear();
        self.store.reset();
        if let Err(e) = &cleared {
            tracing::warn!(error = %e, "failed to clear stored token");
        }
        cleared
    }

    /// Validate, log in, persist the token, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on invalid input, CMS rejection, or storage failure.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionState, AuthError> {
        validate_login(email, password)?;
        let request = LoginRequest { identifier: email.trim().to_owned(), password: password.to_owned() };
        let jwt = self.cms.login(&request).await?;
        self.complete(&jwt).await
    }

    /// Validate, register, persist the token, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on invalid input, CMS rejection, or storage failure.
    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> Result<SessionState, AuthError> {
        validate_signup(username, email, password)?;
        let request = RegisterRequest {
            username: username.trim().to_owned(),
            email: email.trim().to_owned(),
            password: password.to_owned(),
        };
        let jwt = self.cms.register(&request).await?;
        self.complete(&jwt).await
    }

    async fn complete(&self, jwt: &str) -> Result<SessionState, AuthError> {
        self.credentials.set(jwt)?;
        Ok(self.refresh().await)
    }
}
