//! Resource access functions.
//!
//! Each method is a fixed method + path delegation to [`ApiClient`]. Nothing
//! here filters, reshapes or validates payloads; validation belongs to the
//! form layer and scoping to the server.

use crate::http::{ApiClient, HttpError};
use hossi_core::resource::{ResourceKind, ResourceRecord};
use hossi_core::session::Credential;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn encode_body<T: Serialize>(path: &str, body: &T) -> Result<Value, HttpError> {
    serde_json::to_value(body).map_err(|e| HttpError::Encode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

impl LoginResponse {
    pub fn credential(&self) -> Credential {
        Credential::new(self.access_token.clone())
    }
}

/// Typed entry points to the Hossi-911 backend.
#[derive(Debug, Clone)]
pub struct HospitalApi {
    client: ApiClient,
}

impl HospitalApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `POST /login`. Does not touch the session store; the caller decides
    /// what to do with the token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, HttpError> {
        let body = encode_body("/login", &LoginRequest { username, password })?;

        let payload = self.client.request(Method::POST, "/login", Some(body)).await?;
        serde_json::from_value(payload).map_err(|e| HttpError::Decode {
            path: "/login".to_string(),
            message: e.to_string(),
        })
    }

    /// `GET` on a collection.
    pub async fn list(&self, kind: ResourceKind) -> Result<Value, HttpError> {
        self.client.get(kind.path()).await
    }

    /// `POST` on a collection.
    pub async fn create(
        &self,
        kind: ResourceKind,
        body: ResourceRecord,
    ) -> Result<Value, HttpError> {
        if !kind.supports_create() {
            return Err(HttpError::UnsupportedOperation(format!(
                "{} cannot be created",
                kind
            )));
        }
        self.client.post(kind.path(), body).await
    }

    pub async fn list_patients(&self) -> Result<Value, HttpError> {
        self.list(ResourceKind::Patients).await
    }

    pub async fn create_patient(&self, body: ResourceRecord) -> Result<Value, HttpError> {
        self.create(ResourceKind::Patients, body).await
    }

    pub async fn list_branches(&self) -> Result<Value, HttpError> {
        self.list(ResourceKind::Branches).await
    }

    pub async fn create_branch(&self, body: ResourceRecord) -> Result<Value, HttpError> {
        self.create(ResourceKind::Branches, body).await
    }

    pub async fn list_users(&self) -> Result<Value, HttpError> {
        self.list(ResourceKind::Users).await
    }

    pub async fn create_user(&self, body: ResourceRecord) -> Result<Value, HttpError> {
        self.create(ResourceKind::Users, body).await
    }

    pub async fn list_appointments(&self) -> Result<Value, HttpError> {
        self.list(ResourceKind::Appointments).await
    }

    pub async fn create_appointment(&self, body: ResourceRecord) -> Result<Value, HttpError> {
        self.create(ResourceKind::Appointments, body).await
    }

    pub async fn list_audits(&self) -> Result<Value, HttpError> {
        self.list(ResourceKind::Audits).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_login_body_shape() {
        let body = encode_body(
            "/login",
            &LoginRequest {
                username: "alice",
                password: "secret",
            },
        )
        .unwrap();
        assert_eq!(body, serde_json::json!({"username": "alice", "password": "secret"}));
    }

    #[test]
    fn test_unserializable_body_is_an_encode_error() {
        let mut body = BTreeMap::new();
        body.insert(vec![1u8], 1u8);

        let err = encode_body("/login", &body).unwrap_err();

        assert!(matches!(err, HttpError::Encode { ref path, .. } if path == "/login"));
        assert_eq!(err.status(), None);
    }
}
