//! Directory-backed session storage.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{DraftError, Result};
use crate::storage::DraftStorage;

/// Longest hex-encoded key used verbatim. Leaves room for the `.json.tmp`
/// suffix under the common 255-byte file name limit.
const MAX_ENCODED_KEY_LEN: usize = 200;

/// One file per key under a session directory.
///
/// File names are the hex-encoded key, so any session id is a valid name.
/// Keys too long for a file name are stored under their SHA-256 instead.
/// Writes go to a temp file that is renamed into place, so a crash never
/// leaves a half-written draft behind.
#[derive(Debug)]
pub struct DirectoryStorage {
    root: PathBuf,
    ephemeral: bool,
}

impl DirectoryStorage {
    /// Use `root` as the storage directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        create_dir(&root)?;
        Ok(Self {
            root,
            ephemeral: false,
        })
    }

    /// Create a fresh session directory under `parent`, deleted on drop.
    ///
    /// This is the desktop analogue of a browser tab's session storage.
    pub fn ephemeral(parent: impl AsRef<Path>) -> Result<Self> {
        let root = parent
            .as_ref()
            .join(format!("session-{}", Uuid::new_v4().simple()));
        create_dir(&root)?;
        tracing::debug!(path = %root.display(), "created ephemeral draft storage");
        Ok(Self {
            root,
            ephemeral: true,
        })
    }

    /// Storage directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let encoded = hex::encode(key);
        if encoded.len() <= MAX_ENCODED_KEY_LEN {
            return self.root.join(format!("{encoded}.json"));
        }
        // `-` never appears in hex, so hashed names cannot collide with plain ones.
        let digest = Sha256::digest(key.as_bytes());
        self.root.join(format!("sha256-{}.json", hex::encode(digest)))
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| DraftError::Io {
        operation: "create directory",
        path: path.to_path_buf(),
        source: e,
    })
}

impl DraftStorage for DirectoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DraftError::Io {
                operation: "read",
                path,
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(|e| DraftError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(value.as_bytes())
            .map_err(|e| DraftError::Io {
                operation: "write",
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| DraftError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename
        fs::rename(&temp_path, &path).map_err(|e| DraftError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.clone(),
            source: e,
        })?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DraftError::Io {
                operation: "delete",
                path,
                source: e,
            }),
        }
    }
}

impl Drop for DirectoryStorage {
    fn drop(&mut self) {
        if !self.ephemeral {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.root) {
            tracing::warn!(path = %self.root.display(), error = %e, "failed to remove session drafts");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_get_remove() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::open(dir.path().join("drafts")).unwrap();

        assert_eq!(storage.get("bcn.formDraft.s1").unwrap(), None);
        storage.set("bcn.formDraft.s1", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get("bcn.formDraft.s1").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove("bcn.formDraft.s1").unwrap();
        storage.remove("bcn.formDraft.s1").unwrap();
        assert_eq!(storage.get("bcn.formDraft.s1").unwrap(), None);
    }

    #[test]
    fn test_keys_with_path_separators_are_safe() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::open(dir.path()).unwrap();
        storage.set("../escape/attempt", "x").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(storage.get("../escape/attempt").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_long_keys_fit_in_a_file_name() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::open(dir.path()).unwrap();
        let key = format!("bcn.formDraft.{}", "x".repeat(300));
        let other = format!("bcn.formDraft.{}", "y".repeat(300));

        storage.set(&key, "long").unwrap();
        storage.set(&other, "other").unwrap();
        assert_eq!(storage.get(&key).unwrap().as_deref(), Some("long"));
        assert_eq!(storage.get(&other).unwrap().as_deref(), Some("other"));

        for entry in fs::read_dir(dir.path()).unwrap() {
            assert!(entry.unwrap().file_name().len() < 255);
        }

        storage.remove(&key).unwrap();
        assert_eq!(storage.get(&key).unwrap(), None);
        assert_eq!(storage.get(&other).unwrap().as_deref(), Some("other"));
    }

    #[test]
    fn test_ephemeral_is_removed_on_drop() {
        let dir = tempdir().unwrap();
        let storage = DirectoryStorage::ephemeral(dir.path()).unwrap();
        let root = storage.root().to_path_buf();
        storage.set("k", "v").unwrap();
        assert!(root.exists());

        drop(storage);
        assert!(!root.exists());
    }
}
