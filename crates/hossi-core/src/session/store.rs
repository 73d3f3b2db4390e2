//! Session store contract and the in-memory implementation.

use super::model::{Credential, Session};
use crate::error::Result;
use crate::event::{AuthEvent, AuthEventListener};
use std::sync::RwLock;

/// Process-wide holder of the current session.
///
/// Implementations must keep credential and identity together: after any
/// sequence of calls `get_session` returns either a full session or `None`.
/// Mutations never await, so no caller can observe a half-applied update.
pub trait SessionStore: Send + Sync {
    /// Replaces the current session.
    fn set_session(&self, session: Session) -> Result<()>;

    /// Removes the current session. Calling it while anonymous is a no-op.
    ///
    /// The process is anonymous afterwards even on `Err`; the error means
    /// durable state may still hold the old session.
    fn clear_session(&self) -> Result<()>;

    /// Returns the current session, if any.
    fn get_session(&self) -> Option<Session>;

    /// Returns the current credential, if any.
    fn credential(&self) -> Option<Credential> {
        self.get_session().map(|session| session.credential)
    }

    /// Returns true when a session is held.
    fn is_authenticated(&self) -> bool {
        self.get_session().is_some()
    }
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that starts out authenticated.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for InMemorySessionStore {
    fn set_session(&self, session: Session) -> Result<()> {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(session);
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let mut guard = self.session.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }

    fn get_session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl AuthEventListener for InMemorySessionStore {
    fn on_auth_event(&self, event: &AuthEvent) {
        if let AuthEvent::Unauthorized { .. } = event {
            // Infallible for the in-memory store.
            let _ = self.clear_session();
        }
    }
}
