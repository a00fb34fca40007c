//! Process-wide holder of the signed-in user.
//!
//! The stored token is the source of truth for being signed in: once the
//! HTTP client drops it (a 401), the session reports no user.

use std::sync::{Arc, RwLock};

use crate::api::{AuthApi, AuthSession, LoginOutcome, TwoFactorChallenge};
use crate::http::{ApiClient, ApiError};
use crate::models::{User, APPOINTMENTS_MODULE, MAKE_HUGE_SALE};
use crate::navigation::Route;
use crate::storage::{self, USER_KEY};
use crate::validation::LoginForm;

/// Result of the first sign-in step.
#[derive(Debug, Clone, PartialEq)]
pub enum SignIn {
    Complete(User),
    NeedsCode(TwoFactorChallenge),
}

#[derive(Clone)]
pub struct SessionContext {
    user: Arc<RwLock<Option<User>>>,
    client: ApiClient,
    auth: AuthApi,
}

impl SessionContext {
    pub fn new(client: &ApiClient) -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
            client: client.clone(),
            auth: AuthApi::new(client),
        }
    }

    /// Restore the session on start: with a stored token, fetch the
    /// profile. Any failure leaves the session empty.
    pub async fn bootstrap(&self) -> Option<User> {
        if self.client.token().is_none() {
            tracing::debug!("No stored token, starting signed out");
            return None;
        }
        match self.auth.me().await {
            Ok(user) => {
                tracing::info!(user = %user.username, "Session restored");
                self.set_user(user.clone());
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session bootstrap failed");
                None
            }
        }
    }

    /// Current user, or `None` once the token is gone.
    pub fn user(&self) -> Option<User> {
        if self.client.token().is_none() {
            if let Ok(mut user) = self.user.write() {
                user.take();
            }
            return None;
        }
        self.user.read().ok()?.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn is_super_admin(&self) -> bool {
        self.user().is_some_and(|u| u.is_super_admin())
    }

    pub fn has_privilege(&self, module: &str, operation: &str) -> bool {
        self.user()
            .is_some_and(|u| u.has_privilege(module, operation))
    }

    /// Whether the appointment price override may be offered.
    pub fn may_huge_sale(&self) -> bool {
        self.has_privilege(APPOINTMENTS_MODULE, MAKE_HUGE_SALE)
    }

    /// Replace the held profile and its cached copy.
    pub fn set_user(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(json) => storage::write_logged(self.client.storage().as_ref(), USER_KEY, &json),
            Err(e) => tracing::warn!(error = %e, "Cannot cache profile"),
        }
        if let Ok(mut current) = self.user.write() {
            *current = Some(user);
        }
    }

    /// First sign-in step.
    pub async fn login(&self, form: &LoginForm) -> Result<SignIn, ApiError> {
        match self.auth.login(form).await? {
            LoginOutcome::Authenticated(session) => Ok(SignIn::Complete(self.establish(session))),
            LoginOutcome::TwoFactorRequired(challenge) => {
                tracing::info!(user = %form.username, "Second factor requested");
                Ok(SignIn::NeedsCode(challenge))
            }
        }
    }

    /// Second sign-in step.
    pub async fn complete_two_factor(&self, challenge: &TwoFactorChallenge, code: &str) -> Result<User, ApiError> {
        let session = self.auth.login_2fa(challenge, code).await?;
        Ok(self.establish(session))
    }

    /// Store the token and profile of a finished sign-in or registration.
    pub fn establish(&self, session: AuthSession) -> User {
        self.client.set_token(&session.token);
        tracing::info!(user = %session.user.username, "Signed in");
        self.set_user(session.user.clone());
        session.user
    }

    /// Re-read the profile on demand.
    pub async fn refresh(&self) -> Result<User, ApiError> {
        let user = self.auth.me().await?;
        self.set_user(user.clone());
        Ok(user)
    }

    /// Best-effort backend logout, then forget everything locally.
    pub async fn logout(&self) {
        if self.client.token().is_some() {
            if let Err(e) = self.auth.logout().await {
                tracing::warn!(error = %e, "Backend logout failed");
            }
        }
        self.client.clear_credentials();
        if let Ok(mut user) = self.user.write() {
            user.take();
        }
        tracing::info!("Signed out");
        self.client.navigator().navigate(Route::Login);
    }
}
