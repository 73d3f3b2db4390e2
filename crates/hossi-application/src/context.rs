//! Wiring of one client instance.

use crate::auth_usecase::AuthUseCase;
use crate::expiry::ExpiryHandler;
use crate::forms;
use crate::navigation::{NavItem, NavigationState, View, nav_items};
use crate::notification::NotificationCenter;
use hossi_core::auth::{Capability, visible_actions};
use hossi_core::config::ClientConfig;
use hossi_core::event::{AuthEventBus, AuthEventListener};
use hossi_core::resource::ResourceKind;
use hossi_core::session::{Identity, SessionStore};
use hossi_core::{HossiError, Result};
use hossi_interaction::{ApiClient, HospitalApi, Transport};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything a front end needs to talk to the backend on behalf of one user.
pub struct ClientContext {
    session: Arc<dyn SessionStore>,
    events: AuthEventBus,
    api: HospitalApi,
    auth: AuthUseCase,
    navigation: Arc<NavigationState>,
    notifications: Arc<NotificationCenter>,
}

impl ClientContext {
    /// Builds the context around `store` and `transport`.
    ///
    /// The store is subscribed to the event bus before the expiry handler, so
    /// the session is already gone when the user is sent back to login.
    pub fn bootstrap<S>(config: &ClientConfig, store: Arc<S>, transport: Arc<dyn Transport>) -> Self
    where
        S: SessionStore + AuthEventListener + 'static,
    {
        let events = AuthEventBus::new();
        let session: Arc<dyn SessionStore> = store.clone();
        events.subscribe(store);

        let initial = if session.is_authenticated() {
            View::Dashboard
        } else {
            View::Login
        };
        let navigation = Arc::new(NavigationState::new(initial));
        let notifications = Arc::new(NotificationCenter::new());
        events.subscribe(Arc::new(ExpiryHandler::new(
            navigation.clone(),
            notifications.clone(),
        )));

        let client = ApiClient::new(
            config.api_base_url.clone(),
            transport,
            session.clone(),
            events.clone(),
        );
        let api = HospitalApi::new(client);
        let auth = AuthUseCase::new(
            api.clone(),
            session.clone(),
            config.login_defaults.clone(),
            navigation.clone(),
            notifications.clone(),
        );

        tracing::debug!(
            "[Context] Bootstrapped against {} (initial view {})",
            config.api_base_url,
            initial
        );

        Self {
            session,
            events,
            api,
            auth,
            navigation,
            notifications,
        }
    }

    pub fn auth(&self) -> &AuthUseCase {
        &self.auth
    }

    pub fn api(&self) -> &HospitalApi {
        &self.api
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn events(&self) -> &AuthEventBus {
        &self.events
    }

    pub fn navigation(&self) -> &Arc<NavigationState> {
        &self.navigation
    }

    pub fn notifications(&self) -> &Arc<NotificationCenter> {
        &self.notifications
    }

    pub fn identity(&self) -> Option<Identity> {
        self.auth.current_identity()
    }

    pub fn capabilities(&self) -> BTreeSet<Capability> {
        visible_actions(self.identity().as_ref())
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        nav_items(self.identity().as_ref())
    }

    /// Checks locally that the current user may touch `kind`.
    ///
    /// This only decides what is offered; the backend enforces the real rule.
    pub fn authorize(&self, kind: ResourceKind) -> Result<Identity> {
        let identity = self.auth.require_identity()?;
        let capability = kind.required_capability();
        if !identity.can(capability) {
            return Err(HossiError::Forbidden(format!(
                "role {} cannot access {}",
                identity.role, kind
            )));
        }
        Ok(identity)
    }

    /// Lists `kind` after the local capability check.
    pub async fn list(&self, kind: ResourceKind) -> Result<Value> {
        self.authorize(kind)?;
        match self.api.list(kind).await {
            Ok(records) => Ok(records),
            Err(e) => {
                let e = HossiError::from(e);
                if !e.is_unauthorized() {
                    self.notifications.error(format!("Failed to fetch {}", kind));
                }
                Err(e)
            }
        }
    }

    /// Validates `raw` as the form for `kind` and creates the record.
    pub async fn create(&self, kind: ResourceKind, raw: Value) -> Result<Value> {
        self.authorize(kind)?;
        let payload = forms::payload_for(kind, raw)?;
        match self.api.create(kind, payload).await {
            Ok(created) => {
                self.notifications.success(format!("Created {}", kind));
                Ok(created)
            }
            Err(e) => {
                let e = HossiError::from(e);
                if !e.is_unauthorized() {
                    self.notifications.error(format!("Error creating {}", kind));
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::SESSION_EXPIRED_MESSAGE;
    use crate::forms::LoginForm;
    use crate::notification::NotificationLevel;
    use async_trait::async_trait;
    use hossi_core::session::{Credential, InMemorySessionStore, Role, Session};
    use hossi_interaction::{ApiRequest, ApiResponse, HttpError};
    use reqwest::StatusCode;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<ApiResponse>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<ApiResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, HttpError> {
            self.requests.lock().unwrap().push(request);
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| ApiResponse::new(StatusCode::OK, "[]")))
        }
    }

    fn session_as(role: Role) -> Session {
        Session::new(
            Credential::new("tok123"),
            Identity {
                id: 7,
                username: "alice".to_string(),
                role,
                branch_id: Some(1),
            },
        )
    }

    fn context(
        session: Option<Session>,
        responses: Vec<ApiResponse>,
    ) -> (ClientContext, Arc<ScriptedTransport>) {
        let store = Arc::new(match session {
            Some(session) => InMemorySessionStore::with_session(session),
            None => InMemorySessionStore::new(),
        });
        let transport = ScriptedTransport::new(responses);
        let ctx = ClientContext::bootstrap(&ClientConfig::default(), store, transport.clone());
        (ctx, transport)
    }

    #[tokio::test]
    async fn test_login_establishes_session_and_opens_dashboard() {
        let (ctx, transport) = context(
            None,
            vec![ApiResponse::new(
                StatusCode::OK,
                r#"{"access_token":"tok123"}"#,
            )],
        );
        assert_eq!(ctx.navigation().current(), View::Login);

        let identity = ctx
            .auth()
            .login(LoginForm::new("alice", "secret"))
            .await
            .unwrap();

        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Admin);
        let session = ctx.session().get_session().unwrap();
        assert_eq!(session.credential.as_str(), "tok123");
        assert_eq!(ctx.navigation().current(), View::Dashboard);
        assert_eq!(transport.requests()[0].body, Some(json!({"username": "alice", "password": "secret"})));

        let pending = ctx.notifications().drain();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn test_blank_login_sends_nothing() {
        let (ctx, transport) = context(None, vec![]);

        let err = ctx.auth().login(LoginForm::new("", "")).await.unwrap_err();

        assert!(err.is_validation());
        assert!(transport.requests().is_empty());
        assert!(ctx.notifications().drain().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_login_notifies_invalid_credentials() {
        let (ctx, _transport) = context(
            None,
            vec![ApiResponse::new(
                StatusCode::UNAUTHORIZED,
                r#"{"msg":"Bad username or password"}"#,
            )],
        );

        let err = ctx
            .auth()
            .login(LoginForm::new("alice", "wrong"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert!(ctx.session().get_session().is_none());
        assert_eq!(ctx.navigation().current(), View::Login);
        let messages: Vec<_> = ctx
            .notifications()
            .drain()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert!(messages.contains(&"Invalid credentials".to_string()));
    }

    #[tokio::test]
    async fn test_expired_session_redirects_to_login() {
        let (ctx, _transport) = context(
            Some(session_as(Role::Admin)),
            vec![ApiResponse::new(StatusCode::UNAUTHORIZED, "")],
        );
        assert_eq!(ctx.navigation().current(), View::Dashboard);
        ctx.navigation().navigate(View::Patients);

        let err = ctx.list(ResourceKind::Patients).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert!(ctx.session().get_session().is_none());
        assert_eq!(ctx.navigation().current(), View::Login);
        let pending = ctx.notifications().drain();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message, SESSION_EXPIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_doctor_cannot_list_audits_locally() {
        let (ctx, transport) = context(Some(session_as(Role::Doctor)), vec![]);

        let err = ctx.list(ResourceKind::Audits).await.unwrap_err();

        assert!(matches!(err, HossiError::Forbidden(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_list_is_refused_without_request() {
        let (ctx, transport) = context(None, vec![]);

        let err = ctx.list(ResourceKind::Patients).await.unwrap_err();

        assert_eq!(err, HossiError::NotLoggedIn);
        assert_eq!(err.to_string(), "Not logged in");
        assert!(transport.requests().is_empty());
        assert!(ctx.notifications().drain().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_notifies_fetch_failure() {
        let (ctx, _transport) = context(
            Some(session_as(Role::Nurse)),
            vec![ApiResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":"boom"}"#,
            )],
        );

        let err = ctx.list(ResourceKind::Appointments).await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(ctx.session().get_session().is_some());
        let pending = ctx.notifications().drain();
        assert_eq!(pending[0].message, "Failed to fetch appointments");
    }

    #[tokio::test]
    async fn test_invalid_branch_is_rejected_before_sending() {
        let (ctx, transport) = context(Some(session_as(Role::Admin)), vec![]);

        let err = ctx
            .create(ResourceKind::Branches, json!({"county": "", "location": "North", "contact": "555", "capacity": 10}))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (ctx, _transport) = context(Some(session_as(Role::Admin)), vec![]);

        ctx.auth().logout().unwrap();

        assert!(ctx.session().get_session().is_none());
        assert!(ctx.capabilities().is_empty());
        assert_eq!(ctx.navigation().current(), View::Login);
        let pending = ctx.notifications().drain();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].level, NotificationLevel::Info);
        assert_eq!(pending[0].message, crate::auth_usecase::LOGOUT_MESSAGE);
    }
}
