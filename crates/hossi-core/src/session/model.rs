//! Session domain model: credential, identity and the composite session.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};

/// Opaque bearer token issued by the backend's `/login` endpoint.
///
/// `Debug` is redacted so the token never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header: `Bearer <token>`.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Role of an authenticated user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Patient,
}

/// Who is logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: u64,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub branch_id: Option<u64>,
}

/// An authenticated session.
///
/// Credential and identity only ever exist together; the anonymous state is
/// `Option::<Session>::None`, never a half-filled record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credential: Credential,
    pub identity: Identity,
}

impl Session {
    pub fn new(credential: Credential, identity: Identity) -> Self {
        Self {
            credential,
            identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_bearer_format() {
        let credential = Credential::new("tok123");
        assert_eq!(credential.bearer(), "Bearer tok123");
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("super-secret");
        assert!(!format!("{:?}", credential).contains("super-secret"));
    }

    #[test]
    fn test_role_string_forms() {
        assert_eq!(Role::Nurse.to_string(), "nurse");
        assert_eq!(Role::from_str("doctor").unwrap(), Role::Doctor);
        assert!(Role::from_str("janitor").is_err());
    }

    #[test]
    fn test_identity_json_shape() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":7,"username":"bob","role":"patient"}"#).unwrap();
        assert_eq!(identity.role, Role::Patient);
        assert_eq!(identity.branch_id, None);
    }
}
