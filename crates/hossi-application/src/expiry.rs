//! View-side reaction to an expired session.

use crate::navigation::{NavigationState, View};
use crate::notification::NotificationCenter;
use hossi_core::event::{AuthEvent, AuthEventListener};
use std::sync::Arc;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Sends the user back to the login view with a notification whenever the
/// backend rejects the credential.
///
/// Clearing the session is the session store's own subscription; this
/// handler only covers navigation and messaging.
pub struct ExpiryHandler {
    navigation: Arc<NavigationState>,
    notifications: Arc<NotificationCenter>,
}

impl ExpiryHandler {
    pub fn new(navigation: Arc<NavigationState>, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            navigation,
            notifications,
        }
    }
}

impl AuthEventListener for ExpiryHandler {
    fn on_auth_event(&self, event: &AuthEvent) {
        match event {
            AuthEvent::Unauthorized { .. } => {
                self.navigation.navigate(View::Login);
                self.notifications.error(SESSION_EXPIRED_MESSAGE);
            }
        }
    }
}
