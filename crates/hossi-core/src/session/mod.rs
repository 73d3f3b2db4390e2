//! Session domain module.
//!
//! - `model`: credential, role, identity and session types
//! - `store`: the `SessionStore` contract and an in-memory implementation
//!
//! The durable, file-backed store lives in `hossi-infrastructure`.

mod model;
mod store;

pub use model::{Credential, Identity, Role, Session};
pub use store::{InMemorySessionStore, SessionStore};
