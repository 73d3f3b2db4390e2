//! Durable key-value slots backed by a single TOML file.
//!
//! All slots are replaced together: writes go to a temp file that is synced
//! and renamed over the original while an exclusive lock is held, so a
//! reader sees either the old set of slots or the new one.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Slot name to value.
pub type Slots = BTreeMap<String, String>;

/// Errors that can occur while reading or writing a slot file.
#[derive(Debug, Error)]
pub enum SlotFileError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<SlotFileError> for hossi_core::HossiError {
    fn from(err: SlotFileError) -> Self {
        match err {
            SlotFileError::Parse(e) => e.into(),
            SlotFileError::Serialize(e) => e.into(),
            other => hossi_core::HossiError::storage(other.to_string()),
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SlotFileError + '_ {
    move |source| SlotFileError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Handle to a slot file on disk.
#[derive(Debug, Clone)]
pub struct SlotFile {
    path: PathBuf,
}

impl SlotFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all slots. A missing or blank file has no slots.
    pub fn read(&self) -> Result<Slots, SlotFileError> {
        if !self.path.exists() {
            return Ok(Slots::new());
        }

        let content = fs::read_to_string(&self.path).map_err(io_err(&self.path))?;
        if content.trim().is_empty() {
            return Ok(Slots::new());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Replaces every slot with `slots` in one atomic step.
    pub fn write(&self, slots: &Slots) -> Result<(), SlotFileError> {
        let _lock = SlotLock::acquire(&self.path)?;

        let body = toml::to_string(slots)?;
        let tmp_path = self.temp_path();

        let mut tmp = File::create(&tmp_path).map_err(io_err(&tmp_path))?;
        restrict_permissions(&tmp_path)?;
        tmp.write_all(body.as_bytes()).map_err(io_err(&tmp_path))?;
        tmp.sync_all().map_err(io_err(&tmp_path))?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path).map_err(io_err(&self.path))?;
        Ok(())
    }

    /// Removes the file and with it every slot. Missing files are fine.
    pub fn clear(&self) -> Result<(), SlotFileError> {
        let _lock = SlotLock::acquire(&self.path)?;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(&self.path)(e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "slots".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), SlotFileError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(io_err(path))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), SlotFileError> {
    Ok(())
}

/// Exclusive lock held for the duration of a write or clear.
///
/// The lock file stays on disk; every holder must lock the same inode.
struct SlotLock {
    #[allow(dead_code)]
    file: File,
}

impl SlotLock {
    fn acquire(path: &Path) -> Result<Self, SlotFileError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(io_err(parent))?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_err(&lock_path))?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| SlotFileError::Lock(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(SlotLock { file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn slots(pairs: &[(&str, &str)]) -> Slots {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_has_no_slots() {
        let temp_dir = TempDir::new().unwrap();
        let file = SlotFile::new(temp_dir.path().join("session.toml"));
        assert!(file.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_replaces_all_slots() {
        let temp_dir = TempDir::new().unwrap();
        let file = SlotFile::new(temp_dir.path().join("session.toml"));

        file.write(&slots(&[("token", "a"), ("user", "{}")])).unwrap();
        file.write(&slots(&[("token", "b")])).unwrap();

        assert_eq!(file.read().unwrap(), slots(&[("token", "b")]));
        assert!(!temp_dir.path().join(".session.toml.tmp").exists());
        assert!(temp_dir.path().join("session.lock").exists());
    }

    #[test]
    fn test_clear_removes_file_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        let file = SlotFile::new(path.clone());

        file.write(&slots(&[("token", "a")])).unwrap();
        file.clear().unwrap();
        file.clear().unwrap();

        assert!(!path.exists());
        assert!(file.read().unwrap().is_empty());
    }

    #[test]
    fn test_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = SlotFile::new(temp_dir.path().join("nested").join("session.toml"));
        file.write(&slots(&[("token", "a")])).unwrap();
        assert_eq!(file.read().unwrap().get("token").map(String::as_str), Some("a"));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        SlotFile::new(path.clone())
            .write(&slots(&[("token", "a")]))
            .unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_file_keeps_its_inode() {
        use std::os::unix::fs::MetadataExt;

        let temp_dir = TempDir::new().unwrap();
        let file = SlotFile::new(temp_dir.path().join("session.toml"));
        let lock_path = temp_dir.path().join("session.lock");

        file.write(&slots(&[("token", "a")])).unwrap();
        let first = fs::metadata(&lock_path).unwrap().ino();
        file.clear().unwrap();
        file.write(&slots(&[("token", "b")])).unwrap();

        assert_eq!(fs::metadata(&lock_path).unwrap().ino(), first);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.toml");
        fs::write(&path, "token = ").unwrap();
        assert!(matches!(
            SlotFile::new(path).read(),
            Err(SlotFileError::Parse(_))
        ));
    }
}
