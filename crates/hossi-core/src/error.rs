//! Error types for the Hossi client.

use thiserror::Error;

/// A shared error type for the Hossi client crates.
///
/// Lower layers keep their own precise errors (the HTTP adapter's
/// `HttpError`, the form layer's `ValidationErrors`); they convert into this
/// type when they cross a crate boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HossiError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Durable session storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// The backend rejected the credential (HTTP 401)
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// The identity lacks the capability required for an action
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Any other failed HTTP exchange
    #[error("Request failed: {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// Input rejected before dispatch
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Refused locally because no session is held
    #[error("Not logged in")]
    NotLoggedIn,
}

impl HossiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Http error
    pub fn http(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Unauthorized error
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HossiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HossiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HossiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HossiError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, HossiError>`.
pub type Result<T> = std::result::Result<T, HossiError>;
