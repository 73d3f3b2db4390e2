pub mod auth;
pub mod config;
pub mod error;
pub mod event;
pub mod resource;
pub mod session;

// Re-export common error type
pub use error::{HossiError, Result};
