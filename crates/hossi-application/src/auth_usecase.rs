//! Login and logout flows.

use crate::forms::{Form, LoginForm};
use crate::navigation::{NavigationState, View};
use crate::notification::NotificationCenter;
use hossi_core::config::IdentityDefaults;
use hossi_core::session::{Identity, SessionStore};
use hossi_core::{HossiError, Result};
use hossi_interaction::HospitalApi;
use std::sync::Arc;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful";
pub const LOGIN_FAILURE_MESSAGE: &str = "Invalid credentials";
pub const LOGOUT_MESSAGE: &str = "Logged out";

/// Use case that owns the transitions between anonymous and authenticated.
pub struct AuthUseCase {
    api: HospitalApi,
    session: Arc<dyn SessionStore>,
    defaults: IdentityDefaults,
    navigation: Arc<NavigationState>,
    notifications: Arc<NotificationCenter>,
}

impl AuthUseCase {
    pub fn new(
        api: HospitalApi,
        session: Arc<dyn SessionStore>,
        defaults: IdentityDefaults,
        navigation: Arc<NavigationState>,
        notifications: Arc<NotificationCenter>,
    ) -> Self {
        Self {
            api,
            session,
            defaults,
            navigation,
            notifications,
        }
    }

    /// Validates the form, exchanges the credentials for a token and
    /// establishes the session.
    ///
    /// The `/login` response only carries the token; id, role and branch come
    /// from the configured [`IdentityDefaults`].
    pub async fn login(&self, form: LoginForm) -> Result<Identity> {
        form.validate()?;

        let response = match self.api.login(&form.username, &form.password).await {
            Ok(response) => response,
            Err(e) => {
                tracing::info!("[Auth] Login failed for {}: {}", form.username, e);
                self.notifications.error(LOGIN_FAILURE_MESSAGE);
                return Err(e.into());
            }
        };

        let session = self
            .defaults
            .session_for(form.username.clone(), response.credential());
        let identity = session.identity.clone();
        self.session.set_session(session)?;

        tracing::info!(
            "[Auth] Logged in as {} ({})",
            identity.username,
            identity.role
        );
        self.navigation.navigate(View::Dashboard);
        self.notifications.success(LOGIN_SUCCESS_MESSAGE);
        Ok(identity)
    }

    /// Ends the session and returns to the login view.
    pub fn logout(&self) -> Result<()> {
        self.session.clear_session()?;
        self.navigation.navigate(View::Login);
        self.notifications.info(LOGOUT_MESSAGE);
        tracing::info!("[Auth] Logged out");
        Ok(())
    }

    /// Identity of the current session, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.session.get_session().map(|session| session.identity)
    }

    /// Fails with [`HossiError::NotLoggedIn`] when no session is held.
    pub fn require_identity(&self) -> Result<Identity> {
        self.current_identity().ok_or(HossiError::NotLoggedIn)
    }
}
