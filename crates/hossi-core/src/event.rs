//! Authentication events published by the HTTP layer.
//!
//! The adapter does not touch storage or navigation itself. It publishes an
//! [`AuthEvent`] and whoever cares (the session store, the view layer)
//! subscribes to the [`AuthEventBus`].

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Events that affect the authentication state of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    /// The backend answered 401 to a call against `path`.
    Unauthorized { path: String },
}

/// Subscriber to authentication events.
///
/// Listeners run synchronously inside [`AuthEventBus::publish`] and must not
/// block.
pub trait AuthEventListener: Send + Sync {
    fn on_auth_event(&self, event: &AuthEvent);
}

/// Synchronous fan-out of [`AuthEvent`]s to registered listeners.
///
/// Delivery happens on the publishing call stack, so by the time `publish`
/// returns every listener has seen the event.
#[derive(Default, Clone)]
pub struct AuthEventBus {
    listeners: Arc<RwLock<Vec<Arc<dyn AuthEventListener>>>>,
}

impl AuthEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Listeners are notified in registration order.
    pub fn subscribe(&self, listener: Arc<dyn AuthEventListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    /// Delivers `event` to every listener.
    pub fn publish(&self, event: &AuthEvent) {
        tracing::debug!("[AuthEventBus] Publishing {:?}", event);

        // Snapshot so listeners may subscribe further listeners without deadlocking.
        let listeners: Vec<Arc<dyn AuthEventListener>> = self
            .listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        for listener in listeners {
            listener.on_auth_event(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl std::fmt::Debug for AuthEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<AuthEvent>>,
    }

    impl AuthEventListener for Recorder {
        fn on_auth_event(&self, event: &AuthEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_publish_reaches_every_listener_once() {
        let bus = AuthEventBus::new();
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        bus.subscribe(first.clone());
        bus.subscribe(second.clone());

        let event = AuthEvent::Unauthorized {
            path: "/users".to_string(),
        };
        bus.publish(&event);

        assert_eq!(*first.seen.lock().unwrap(), vec![event.clone()]);
        assert_eq!(*second.seen.lock().unwrap(), vec![event]);
    }

    #[test]
    fn test_publish_without_listeners() {
        let bus = AuthEventBus::new();
        bus.publish(&AuthEvent::Unauthorized {
            path: "/audits".to_string(),
        });
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(AuthEvent::Unauthorized {
            path: "/login".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "unauthorized");
        assert_eq!(json["path"], "/login");
    }
}
