//! Client configuration model.
//!
//! Loading (environment, `config.toml`) is done by
//! `hossi_infrastructure::ConfigService`; this module only holds the shape
//! and defaults.

use crate::session::{Credential, Identity, Role, Session};
use serde::{Deserialize, Serialize};

/// Base endpoint used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Environment variable that overrides the configured base endpoint.
pub const API_BASE_URL_ENV: &str = "HOSSI_API_BASE_URL";

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend REST API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Identity fields applied to every successful login.
    #[serde(default)]
    pub login_defaults: IdentityDefaults,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            login_defaults: IdentityDefaults::default(),
        }
    }
}

/// Identity fields the `/login` response does not carry.
///
/// The backend only returns an access token, so id, role and branch come
/// from here. Defaults are id 1, admin, branch 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDefaults {
    #[serde(default = "default_id")]
    pub id: u64,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_branch_id")]
    pub branch_id: Option<u64>,
}

fn default_id() -> u64 {
    1
}

fn default_role() -> Role {
    Role::Admin
}

fn default_branch_id() -> Option<u64> {
    Some(1)
}

impl Default for IdentityDefaults {
    fn default() -> Self {
        Self {
            id: default_id(),
            role: default_role(),
            branch_id: default_branch_id(),
        }
    }
}

impl IdentityDefaults {
    /// Builds the identity for `username`.
    pub fn identity_for(&self, username: impl Into<String>) -> Identity {
        Identity {
            id: self.id,
            username: username.into(),
            role: self.role,
            branch_id: self.branch_id,
        }
    }

    /// Builds the full session for a freshly issued token.
    pub fn session_for(&self, username: impl Into<String>, credential: Credential) -> Session {
        Session::new(credential, self.identity_for(username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:5000");
    }

    #[test]
    fn test_partial_login_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            api_base_url = "https://hossi.example.org"

            [login_defaults]
            role = "nurse"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://hossi.example.org");
        assert_eq!(config.login_defaults.role, Role::Nurse);
        assert_eq!(config.login_defaults.id, 1);
        assert_eq!(config.login_defaults.branch_id, Some(1));
    }

    #[test]
    fn test_identity_for_username() {
        let identity = IdentityDefaults::default().identity_for("alice");
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.branch_id, Some(1));
    }
}
