//! Session store that survives restarts.
//!
//! The session is kept in two slots of a [`SlotFile`]: `token` holds the raw
//! bearer token and `user` holds the identity as JSON. Both slots are always
//! written and removed together.

use crate::paths::HossiPaths;
use crate::storage::{SlotFile, SlotFileError, Slots};
use hossi_core::event::{AuthEvent, AuthEventListener};
use hossi_core::session::{Credential, Identity, Session, SessionStore};
use hossi_core::{HossiError, Result};
use std::path::PathBuf;
use std::sync::RwLock;

/// Slot holding the bearer token.
pub const TOKEN_SLOT: &str = "token";
/// Slot holding the JSON-encoded identity.
pub const USER_SLOT: &str = "user";

/// File-backed [`SessionStore`] with an in-memory cache.
///
/// Reads never touch the disk; the file is read once when the store is
/// opened and rewritten on every mutation.
#[derive(Debug)]
pub struct FileSessionStore {
    file: SlotFile,
    cache: RwLock<Option<Session>>,
}

impl FileSessionStore {
    /// Opens the store at the default location (`~/.config/hossi/session.toml`).
    pub fn open_default() -> Result<Self> {
        let path = HossiPaths::session_file().map_err(|e| HossiError::config(e.to_string()))?;
        Self::open(path)
    }

    /// Opens the store at `path`, restoring any session persisted there.
    ///
    /// A file that is not valid TOML, holds only one of the two slots, or has
    /// an identity that no longer parses is discarded and the store starts
    /// anonymous.
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = SlotFile::new(path);
        let decoded = match file.read() {
            Ok(slots) => Self::decode(&slots),
            Err(SlotFileError::Parse(e)) => Err(format!("not valid TOML: {}", e)),
            Err(e) => return Err(e.into()),
        };
        let restored = match decoded {
            Ok(session) => session,
            Err(reason) => {
                tracing::warn!(
                    "[SessionStore] Discarding unusable session file {}: {}",
                    file.path().display(),
                    reason
                );
                file.clear()?;
                None
            }
        };

        if let Some(session) = &restored {
            tracing::info!(
                "[SessionStore] Restored session for {}",
                session.identity.username
            );
        }

        Ok(Self {
            file,
            cache: RwLock::new(restored),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    fn decode(slots: &Slots) -> std::result::Result<Option<Session>, String> {
        match (slots.get(TOKEN_SLOT), slots.get(USER_SLOT)) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => {
                let identity: Identity = serde_json::from_str(user)
                    .map_err(|e| format!("invalid user slot: {}", e))?;
                Ok(Some(Session::new(Credential::new(token.clone()), identity)))
            }
            (Some(_), None) => Err("token slot without user slot".to_string()),
            (None, Some(_)) => Err("user slot without token slot".to_string()),
        }
    }

    fn encode(session: &Session) -> Result<Slots> {
        let mut slots = Slots::new();
        slots.insert(
            TOKEN_SLOT.to_string(),
            session.credential.as_str().to_string(),
        );
        slots.insert(
            USER_SLOT.to_string(),
            serde_json::to_string(&session.identity)?,
        );
        Ok(slots)
    }
}

impl SessionStore for FileSessionStore {
    fn set_session(&self, session: Session) -> Result<()> {
        let slots = Self::encode(&session)?;
        // Cache lock is held across the file write: file and cache change together.
        let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
        self.file.write(&slots)?;
        tracing::debug!(
            "[SessionStore] Stored session for {}",
            session.identity.username
        );
        *guard = Some(session);
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // Cache goes first; a failed file removal still leaves this process anonymous.
        let had_session = guard.take().is_some();
        self.file.clear()?;
        if had_session {
            tracing::debug!("[SessionStore] Session cleared");
        }
        Ok(())
    }

    fn get_session(&self) -> Option<Session> {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl AuthEventListener for FileSessionStore {
    fn on_auth_event(&self, event: &AuthEvent) {
        match event {
            AuthEvent::Unauthorized { path } => {
                tracing::info!("[SessionStore] Unauthorized response on {}, clearing session", path);
                if let Err(e) = self.clear_session() {
                    tracing::warn!("[SessionStore] Failed to remove session file, retrying: {}", e);
                    if let Err(e) = self.file.clear() {
                        tracing::error!(
                            "[SessionStore] Session file {} still on disk: {}",
                            self.file.path().display(),
                            e
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hossi_core::session::Role;
    use std::fs;
    use tempfile::TempDir;

    fn sample_session() -> Session {
        Session::new(
            Credential::new("tok123"),
            Identity {
                id: 1,
                username: "alice".to_string(),
                role: Role::Admin,
                branch_id: Some(1),
            },
        )
    }

    #[test]
    fn test_session_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");

        let store = FileSessionStore::open(path.clone()).unwrap();
        assert!(store.get_session().is_none());
        store.set_session(sample_session()).unwrap();

        let reopened = FileSessionStore::open(path).unwrap();
        assert_eq!(reopened.get_session(), Some(sample_session()));
    }

    #[test]
    fn test_slots_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let store = FileSessionStore::open(path.clone()).unwrap();
        store.set_session(sample_session()).unwrap();

        let slots = SlotFile::new(path).read().unwrap();
        assert_eq!(slots.get(TOKEN_SLOT).map(String::as_str), Some("tok123"));
        let user: serde_json::Value = serde_json::from_str(&slots[USER_SLOT]).unwrap();
        assert_eq!(user["username"], "alice");
        assert_eq!(user["role"], "admin");
    }

    #[test]
    fn test_clear_removes_both_slots() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let store = FileSessionStore::open(path.clone()).unwrap();

        store.set_session(sample_session()).unwrap();
        store.clear_session().unwrap();
        store.clear_session().unwrap();

        assert!(store.get_session().is_none());
        assert!(!path.exists());
        assert!(FileSessionStore::open(path).unwrap().get_session().is_none());
    }

    #[test]
    fn test_token_without_user_loads_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "token = \"orphan\"\n").unwrap();

        let store = FileSessionStore::open(path.clone()).unwrap();
        assert!(store.get_session().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_unparsable_user_loads_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "token = \"tok\"\nuser = \"not json\"\n").unwrap();

        let store = FileSessionStore::open(path).unwrap();
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_malformed_toml_loads_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "token = \"tok\"\nuser = \"{\\\"id\\\":1\n").unwrap();

        let store = FileSessionStore::open(path.clone()).unwrap();
        assert!(store.get_session().is_none());
        assert!(!path.exists());

        store.set_session(sample_session()).unwrap();
        assert_eq!(
            FileSessionStore::open(path).unwrap().get_session(),
            Some(sample_session())
        );
    }

    #[test]
    fn test_failed_removal_still_leaves_process_anonymous() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let store = FileSessionStore::open(path.clone()).unwrap();
        store.set_session(sample_session()).unwrap();

        // A non-empty directory in place of the file cannot be unlinked.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(store.clear_session().is_err());
        assert!(store.get_session().is_none());
    }

    #[test]
    fn test_unauthorized_event_clears_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let store = FileSessionStore::open(path.clone()).unwrap();
        store.set_session(sample_session()).unwrap();

        store.on_auth_event(&AuthEvent::Unauthorized {
            path: "/patients".to_string(),
        });

        assert!(store.get_session().is_none());
        assert!(!path.exists());
    }
}
