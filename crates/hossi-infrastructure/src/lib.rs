pub mod config_service;
pub mod file_session_store;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::file_session_store::FileSessionStore;
